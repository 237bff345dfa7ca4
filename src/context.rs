use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation and deadline context.
///
/// A context is cloned freely into stream drivers, search workers and table
/// evaluators; all clones share the same cancellation flag. Cancellation is
/// cooperative: engines check the context at their suspension points (stream
/// `take` boundaries, between propagators, between search nodes, between
/// answer emissions) and unwind promptly.
#[derive(Clone, Debug)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Context {
        Context {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A context that cancels itself at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Context {
        Context {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// A context that cancels itself after `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Context {
        Context::with_deadline(Instant::now() + timeout)
    }

    /// Flag the context cancelled; all clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Suspension-point check: `Err(Cancelled)` once the flag is up or the
    /// deadline has passed.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_cancel() {
        let ctx = Context::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.checkpoint().is_ok());

        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.checkpoint(), Err(Error::Cancelled));
    }

    #[test]
    fn test_context_deadline() {
        let ctx = Context::with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(ctx.is_cancelled());

        let ctx = Context::with_timeout(Duration::from_secs(3600));
        assert!(!ctx.is_cancelled());
    }
}
