use crate::lterm::LTerm;
use crate::state::constraint::{run_by_check, Constraint, Outcome};
use crate::state::{SMap, SResult, State};
use std::fmt;
use std::rc::Rc;

/// The value kinds a type constraint can demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Symbol,
    Number,
    String,
    Boolean,
    Vector,
}

impl TypeKind {
    fn matches(&self, t: &LTerm) -> bool {
        match self {
            TypeKind::Symbol => t.is_symbol(),
            TypeKind::Number => t.is_number(),
            TypeKind::String => t.is_string(),
            TypeKind::Boolean => t.is_bool(),
            TypeKind::Vector => t.is_list(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TypeKind::Symbol => "symbol",
            TypeKind::Number => "number",
            TypeKind::String => "string",
            TypeKind::Boolean => "boolean",
            TypeKind::Vector => "vector",
        }
    }
}

/// Constrains the resolved value of a term to a value kind. Pending until
/// the term walks to a non-variable.
#[derive(Clone, Debug)]
pub struct TypeConstraint {
    u: LTerm,
    kind: TypeKind,
}

impl TypeConstraint {
    pub fn new(u: LTerm, kind: TypeKind) -> Rc<TypeConstraint> {
        Rc::new(TypeConstraint { u, kind })
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

impl Constraint for TypeConstraint {
    fn operands(&self) -> Vec<LTerm> {
        vec![self.u.clone()]
    }

    fn check(&self, smap: &SMap) -> Outcome {
        let walked = smap.walk(&self.u);
        if walked.is_var() {
            Outcome::Pending
        } else if self.kind.matches(walked) {
            Outcome::Satisfied
        } else {
            Outcome::Violated
        }
    }

    fn run(self: Rc<Self>, state: State) -> SResult {
        run_by_check(self, state)
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}o({})", self.kind.name(), self.u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_check() {
        let x = LTerm::any();
        let c = TypeConstraint::new(x.clone(), TypeKind::Number);

        let smap = SMap::new();
        assert_eq!(c.check(&smap), Outcome::Pending);

        let mut smap = SMap::new();
        smap.extend(x.clone(), LTerm::from(1));
        assert_eq!(c.check(&smap), Outcome::Satisfied);

        let mut smap = SMap::new();
        smap.extend(x.clone(), LTerm::from("one"));
        assert_eq!(c.check(&smap), Outcome::Violated);
    }

    #[test]
    fn test_type_vector() {
        let x = LTerm::any();
        let c = TypeConstraint::new(x.clone(), TypeKind::Vector);
        let mut smap = SMap::new();
        smap.extend(x.clone(), LTerm::empty_list());
        assert_eq!(c.check(&smap), Outcome::Satisfied);
    }
}
