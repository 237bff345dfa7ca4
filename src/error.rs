use thiserror::Error;

/// Engine-level errors.
///
/// Logical failure is never an `Error`: a failed unification, a violated
/// constraint or an unsatisfiable model flows as an empty stream or an empty
/// solution set. `Error` covers the recoverable search/engine conditions the
/// caller must be able to distinguish.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A propagator emptied a variable's domain.
    #[error("inconsistent: {propagator} emptied the domain of variable {variable}")]
    Inconsistent {
        propagator: &'static str,
        variable: u32,
    },

    /// A value outside the model's 1-based domain range.
    #[error("invalid value {value}")]
    InvalidValue { value: isize },

    /// A domain operation produced an empty domain outside of propagation.
    #[error("empty domain for variable {variable}")]
    DomainEmpty { variable: u32 },

    /// A malformed model or call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Node or time limit hit; any incumbent travels with the result value.
    #[error("search limit reached")]
    SearchLimitReached,

    /// Cooperative cancellation through the context.
    #[error("cancelled")]
    Cancelled,

    /// A non-integer binding on a variable that carries a finite domain.
    #[error("type mismatch on variable {variable}")]
    TypeMismatch { variable: String },

    /// Negation of a predicate that is not in a strictly lower stratum.
    #[error("stratification violation: {predicate} negated from {caller}")]
    StratificationViolation { predicate: String, caller: String },

    /// The SLG SCC fixpoint did not converge within the configured bound.
    #[error("fixpoint did not converge after {iterations} iterations")]
    FixpointOverflow { iterations: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
