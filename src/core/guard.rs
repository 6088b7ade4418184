//! Guard predicates for controlling transition admissibility.
//!
//! Guards are zero-argument boolean functions attached to transition
//! targets. The engine invokes them before the command's action runs and
//! assigns no semantics beyond true/false.

use std::fmt;

/// Predicate that decides whether a transition target is currently
/// admissible.
///
/// Guards take no arguments: any data the predicate needs must be captured
/// in the closure when the guard is created. This keeps the engine free of
/// context plumbing while still allowing arbitrarily rich conditions.
///
/// # Example
///
/// ```rust
/// use shifter::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let signature_outstanding = Arc::new(AtomicBool::new(true));
///
/// let flag = Arc::clone(&signature_outstanding);
/// let needs_signature = Guard::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(needs_signature.check());
///
/// signature_outstanding.store(false, Ordering::SeqCst);
/// assert!(!needs_signature.check());
/// ```
pub struct Guard {
    predicate: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
