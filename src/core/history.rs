//! Committed-transition history tracking.
//!
//! Provides an immutable, in-memory audit trail of the transitions an
//! engine has committed. The history is never persisted by the crate;
//! serde support exists only as an opt-in diagnostic export and applies
//! when the identifier types are themselves serializable.

use super::ident::{CommandId, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, C: Serialize",
    deserialize = "S: serde::de::DeserializeOwned, C: serde::de::DeserializeOwned"
))]
pub struct TransitionRecord<S: StateId, C: CommandId> {
    /// The state the subject was in before the command.
    pub from: S,
    /// The state the transition committed.
    pub to: S,
    /// The command that triggered the transition.
    pub command: C,
    /// When the transition committed.
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// History is immutable - [`record`](TransitionHistory::record) returns a
/// new history with the record appended, leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use shifter::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history: TransitionHistory<&str, &str> = TransitionHistory::new();
///
/// let history = history.record(TransitionRecord {
///     from: "draft",
///     to: "confirmed",
///     command: "confirm",
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path, vec![&"draft", &"confirmed"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, C: Serialize",
    deserialize = "S: serde::de::DeserializeOwned, C: serde::de::DeserializeOwned"
))]
pub struct TransitionHistory<S: StateId, C: CommandId> {
    records: Vec<TransitionRecord<S, C>>,
}

impl<S: StateId, C: CommandId> Default for TransitionHistory<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, C: CommandId> TransitionHistory<S, C> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, returning a new history.
    pub fn record(&self, record: TransitionRecord<S, C>) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Get the path of states traversed: the initial state, then the
    /// to-state of each committed transition.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Elapsed time between the first and last committed transition.
    ///
    /// Returns `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All records in commit order.
    pub fn records(&self) -> &[TransitionRecord<S, C>] {
        &self.records
    }
}
