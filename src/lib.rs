//! Shifter: a command-driven finite state machine engine
//!
//! Shifter separates the *machine* from the *subject* it governs. The
//! engine owns a declarative transition table and an execution algorithm;
//! the state being governed lives in an external subject the engine only
//! touches through the narrow [`Subject`] contract.
//!
//! # Core Concepts
//!
//! - **States and commands**: opaque caller-supplied identifiers (integers,
//!   strings, enums) via the [`StateId`] and [`CommandId`] marker traits
//! - **Actions**: fallible side effects bound to commands, run before a
//!   transition commits
//! - **Guards**: boolean predicates that decide whether a specific target
//!   state is currently admissible
//! - **Subject**: the external object whose state the engine reads and
//!   mutates
//!
//! # Example
//!
//! The classic turnstile: insert a coin to unlock, push the arm to lock.
//!
//! ```rust
//! use shifter::{StateMachine, Subject};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum GateState {
//!     Locked,
//!     Unlocked,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum GateCommand {
//!     InsertCoin,
//!     PushArm,
//! }
//!
//! struct Turnstile {
//!     state: GateState,
//! }
//!
//! impl Subject<GateState> for Turnstile {
//!     fn state(&self) -> GateState {
//!         self.state.clone()
//!     }
//!
//!     fn set_state(&mut self, state: GateState) {
//!         self.state = state;
//!     }
//! }
//!
//! let mut machine = StateMachine::new(Turnstile {
//!     state: GateState::Locked,
//! });
//!
//! machine
//!     .register_command(GateCommand::InsertCoin, || Ok(()))
//!     .register_command(GateCommand::PushArm, || Ok(()));
//!
//! machine
//!     .from(GateState::Locked)
//!     .on(GateCommand::InsertCoin)
//!     .to(GateState::Unlocked)
//!     .add();
//! machine
//!     .from(GateState::Unlocked)
//!     .on(GateCommand::PushArm)
//!     .to(GateState::Locked)
//!     .add();
//!
//! machine.execute(GateCommand::InsertCoin).unwrap();
//! assert_eq!(machine.current_state(), GateState::Unlocked);
//!
//! machine.execute(GateCommand::PushArm).unwrap();
//! assert_eq!(machine.current_state(), GateState::Locked);
//!
//! // Pushing the arm while locked is structurally inapplicable.
//! assert!(machine.execute(GateCommand::PushArm).is_err());
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{CommandId, Guard, StateId, Subject, TransitionHistory, TransitionRecord};
pub use builder::{TransitionBuilder, TransitionSource, TransitionTarget};
pub use engine::{Action, BoxError, ExecuteError, StateMachine, Target, TransitionTable};
