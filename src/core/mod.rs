//! Core state machine types.
//!
//! This module contains the vocabulary the engine is built from:
//! - Opaque state and command identifiers via the `StateId` and `CommandId`
//!   marker traits
//! - Guard predicates for transition admissibility
//! - The `Subject` contract for the governed object
//! - Immutable history tracking of committed transitions

mod guard;
mod history;
mod ident;
mod subject;

pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use ident::{CommandId, StateId};
pub use subject::Subject;
