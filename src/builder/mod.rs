//! Fluent API for declaring transitions.
//!
//! Sugar over [`StateMachine::add_transition`]: each `.add()` commits the
//! declaration synchronously and hands back a fresh source scoped to the
//! same engine and from-state, so no guard or target ever leaks between
//! chained declarations.
//!
//! [`StateMachine::add_transition`]: crate::StateMachine::add_transition

mod transition;

pub use transition::{TransitionBuilder, TransitionSource, TransitionTarget};
