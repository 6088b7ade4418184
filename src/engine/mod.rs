//! The execution engine: transition table, error taxonomy, and the
//! command-execution algorithm.
//!
//! Everything here is strictly synchronous. `execute` runs to completion
//! on the caller's thread; the engine takes no locks and imposes no
//! deadlines. Callers interleaving setup and execution across threads must
//! serialize access externally.

mod error;
mod machine;
mod table;

pub use error::{BoxError, ExecuteError};
pub use machine::{Action, StateMachine};
pub use table::{Target, TransitionTable};
