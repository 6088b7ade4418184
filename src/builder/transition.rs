//! Typestate builder for transition declarations.
//!
//! The chain is `machine.from(s).on(c).to(t).when(p).add()`. Required
//! fields are enforced by the type system: `.add()` only exists once a
//! command and target state have been supplied, so there is no runtime
//! "missing field" failure mode.

use crate::core::{CommandId, Guard, StateId, Subject};
use crate::engine::StateMachine;

/// A transition declaration anchored at a from-state.
///
/// Created by [`StateMachine::from`]; call [`on`](TransitionSource::on) to
/// pick the command the declaration reacts to.
pub struct TransitionSource<'a, S: StateId, C: CommandId, M: Subject<S>> {
    machine: &'a mut StateMachine<S, C, M>,
    from: S,
}

impl<'a, S: StateId, C: CommandId, M: Subject<S>> TransitionSource<'a, S, C, M> {
    pub(crate) fn new(machine: &'a mut StateMachine<S, C, M>, from: S) -> Self {
        Self { machine, from }
    }

    /// Choose the command this declaration reacts to.
    pub fn on(self, command: C) -> TransitionBuilder<'a, S, C, M> {
        TransitionBuilder {
            machine: self.machine,
            from: self.from,
            command,
        }
    }
}

/// A declaration that knows its from-state and command but not yet its
/// target.
pub struct TransitionBuilder<'a, S: StateId, C: CommandId, M: Subject<S>> {
    machine: &'a mut StateMachine<S, C, M>,
    from: S,
    command: C,
}

impl<'a, S: StateId, C: CommandId, M: Subject<S>> TransitionBuilder<'a, S, C, M> {
    /// Choose the target state.
    pub fn to(self, state: S) -> TransitionTarget<'a, S, C, M> {
        TransitionTarget {
            machine: self.machine,
            from: self.from,
            command: self.command,
            to: state,
            guard: None,
        }
    }
}

/// A complete declaration, optionally guarded, ready to commit.
pub struct TransitionTarget<'a, S: StateId, C: CommandId, M: Subject<S>> {
    machine: &'a mut StateMachine<S, C, M>,
    from: S,
    command: C,
    to: S,
    guard: Option<Guard>,
}

impl<'a, S: StateId, C: CommandId, M: Subject<S>> TransitionTarget<'a, S, C, M> {
    /// Guard the target with a predicate closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Guard the target with a pre-built [`Guard`].
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Commit the declaration to the transition table.
    ///
    /// Returns a fresh [`TransitionSource`] scoped to the same from-state,
    /// so further `.on(...)` declarations can be chained without carrying
    /// over this declaration's target or guard.
    pub fn add(self) -> TransitionSource<'a, S, C, M> {
        let TransitionTarget {
            machine,
            from,
            command,
            to,
            guard,
        } = self;

        machine.add_transition(from.clone(), command, to, guard);
        TransitionSource { machine, from }
    }
}
