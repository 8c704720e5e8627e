//! Event types emitted toward the reporting collaborator.

use serde::{Deserialize, Serialize};

use crate::{JobId, Priority, UserId};

/// A job was appended to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedEvent {
    pub job_id: JobId,
    pub user_id: UserId,
    pub priority: Priority,
}

/// The logical clock advanced to `clock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub clock: u64,
}

/// A job waited past the expiry threshold and was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredEvent {
    pub job_id: JobId,
    pub user_id: UserId,
    pub waiting_time: u64,
}

/// One live job as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub job_id: JobId,
    pub user_id: UserId,
    pub priority: Priority,
    pub waiting_time: u64,
}

/// Result of a single `advance` call: the tick, then whatever the sweep removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub tick: TickEvent,
    pub expired: Vec<ExpiredEvent>,
}

/// Events emitted by the queue manager, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    /// A job was submitted.
    Submitted(SubmittedEvent),
    /// The clock advanced.
    Tick(TickEvent),
    /// A job expired during a sweep.
    Expired(ExpiredEvent),
}

impl QueueEvent {
    /// Get the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            QueueEvent::Submitted(e) => Some(&e.job_id),
            QueueEvent::Expired(e) => Some(&e.job_id),
            QueueEvent::Tick(_) => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            QueueEvent::Submitted(e) => format!(
                "Job {} submitted by {} (priority {})",
                e.job_id, e.user_id, e.priority
            ),
            QueueEvent::Tick(e) => format!("Clock -> {}", e.clock),
            QueueEvent::Expired(e) => format!(
                "Job {} from {} expired after {} ticks",
                e.job_id, e.user_id, e.waiting_time
            ),
        }
    }
}

impl From<SubmittedEvent> for QueueEvent {
    fn from(e: SubmittedEvent) -> Self {
        QueueEvent::Submitted(e)
    }
}

impl From<TickEvent> for QueueEvent {
    fn from(e: TickEvent) -> Self {
        QueueEvent::Tick(e)
    }
}

impl From<ExpiredEvent> for QueueEvent {
    fn from(e: ExpiredEvent) -> Self {
        QueueEvent::Expired(e)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn events_are_tagged_in_snake_case() {
        let event = QueueEvent::Expired(ExpiredEvent {
            job_id: "J1".into(),
            user_id: "alice".into(),
            waiting_time: 11,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "expired");
        assert_eq!(json["job_id"], "J1");
        assert_eq!(json["waiting_time"], 11);

        let tick = serde_json::to_value(QueueEvent::Tick(TickEvent { clock: 4 })).unwrap();
        assert_eq!(tick, serde_json::json!({ "event": "tick", "clock": 4 }));
    }

    #[test]
    fn tick_has_no_job() {
        assert!(QueueEvent::Tick(TickEvent { clock: 1 }).job_id().is_none());
        assert_eq!(QueueEvent::Tick(TickEvent { clock: 1 }).description(), "Clock -> 1");
    }
}
