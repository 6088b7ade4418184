//! Opaque identifier traits for states and commands.
//!
//! The engine hardcodes no domain's state or command set. Any type that is
//! cloneable, comparable by equality, hashable, and debuggable can serve as
//! an identifier; both traits are blanket-implemented, so integers, strings,
//! and user-defined enums all qualify with no ceremony.

use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for state identifiers.
///
/// States are opaque values: the engine compares them by equality and hashes
/// them for transition table lookup, but assigns no further meaning.
///
/// # Example
///
/// ```rust
/// use shifter::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum DoorState {
///     Open,
///     Closed,
/// }
///
/// fn assert_state_id<S: StateId>() {}
///
/// assert_state_id::<DoorState>();
/// assert_state_id::<u32>();
/// assert_state_id::<String>();
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Marker trait for command identifiers.
///
/// Commands name requested operations. Like states, they are opaque values
/// compared by equality and hashed for action lookup.
pub trait CommandId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> CommandId for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
