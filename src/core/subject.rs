//! The contract between the engine and the object it governs.

use super::ident::StateId;

/// The external entity whose lifecycle state the engine mutates.
///
/// The subject's state is the single source of truth: the engine calls
/// [`state`](Subject::state) at the start of every execution and never
/// caches the value across calls. [`set_state`](Subject::set_state) is
/// called exactly once, only when a transition commits.
///
/// # Example
///
/// ```rust
/// use shifter::Subject;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum OrderState {
///     Created,
///     Paid,
/// }
///
/// struct Order {
///     state: OrderState,
///     total_cents: u64,
/// }
///
/// impl Subject<OrderState> for Order {
///     fn state(&self) -> OrderState {
///         self.state.clone()
///     }
///
///     fn set_state(&mut self, state: OrderState) {
///         self.state = state;
///     }
/// }
/// ```
pub trait Subject<S: StateId> {
    /// Read the subject's current state.
    fn state(&self) -> S;

    /// Overwrite the subject's current state.
    fn set_state(&mut self, state: S);
}
