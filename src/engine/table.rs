//! The transition table: (from-state, command) to ordered candidate
//! targets.

use crate::core::{CommandId, Guard, StateId};
use std::collections::HashMap;

/// A candidate destination for a (from-state, command) pair.
///
/// A target without a guard is unconditionally admissible. A guarded
/// target is admissible only while its predicate returns true.
#[derive(Debug)]
pub struct Target<S: StateId> {
    to: S,
    guard: Option<Guard>,
}

impl<S: StateId> Target<S> {
    pub(crate) fn new(to: S, guard: Option<Guard>) -> Self {
        Self { to, guard }
    }

    /// The destination state.
    pub fn to(&self) -> &S {
        &self.to
    }

    /// The guard, if the target is conditional.
    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }
}

/// Mapping from (from-state, command) to its ordered candidate targets.
///
/// Targets for a pair are kept in insertion order; execution selects the
/// first admissible one, so an unconditional target registered first wins
/// before any later guard is evaluated. For a fixed pair there is at most
/// one target per distinct to-state: re-registering an existing to-state
/// is a no-op and never overwrites an existing guard.
#[derive(Debug)]
pub struct TransitionTable<S: StateId, C: CommandId> {
    entries: HashMap<S, HashMap<C, Vec<Target<S>>>>,
}

impl<S: StateId, C: CommandId> Default for TransitionTable<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, C: CommandId> TransitionTable<S, C> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a candidate target.
    ///
    /// Returns `true` if the target was added, `false` if a target for the
    /// same to-state already existed under the pair (no-op).
    pub fn insert(&mut self, from: S, command: C, to: S, guard: Option<Guard>) -> bool {
        let targets = self
            .entries
            .entry(from)
            .or_default()
            .entry(command)
            .or_default();

        if targets.iter().any(|t| t.to == to) {
            return false;
        }

        targets.push(Target::new(to, guard));
        true
    }

    /// Candidate targets for a pair, in insertion order.
    pub fn targets(&self, from: &S, command: &C) -> Option<&[Target<S>]> {
        self.entries
            .get(from)
            .and_then(|by_command| by_command.get(command))
            .map(Vec::as_slice)
    }
}
