//! Job domain types for print requests held in the queue.

use serde::{Deserialize, Serialize};

/// Identifier of a print job.
///
/// Opaque to the queue: empty strings are accepted and duplicates are
/// tracked as distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user who submitted a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority rank attached to a job.
///
/// Stored and reported only. The queue keeps arrival order regardless of
/// priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submitted print request. Never mutated after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintJob {
    /// Submitting user.
    pub user_id: UserId,
    /// Job identifier.
    pub job_id: JobId,
    /// Reported priority.
    pub priority: Priority,
    /// Logical clock value when the job was submitted.
    pub submitted_at: u64,
}

impl PrintJob {
    pub fn new(
        user_id: impl Into<UserId>,
        job_id: impl Into<JobId>,
        priority: impl Into<Priority>,
        submitted_at: u64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            job_id: job_id.into(),
            priority: priority.into(),
            submitted_at,
        }
    }

    /// Ticks this job has waited as of `clock`.
    pub fn waiting_time(&self, clock: u64) -> u64 {
        clock.saturating_sub(self.submitted_at)
    }
}

/// Caller-side description of a job to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub user_id: UserId,
    pub job_id: JobId,
    #[serde(default)]
    pub priority: Priority,
}

impl JobRequest {
    pub fn new(
        user_id: impl Into<UserId>,
        job_id: impl Into<JobId>,
        priority: impl Into<Priority>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            job_id: job_id.into(),
            priority: priority.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn waiting_time_counts_ticks_since_submission() {
        let job = PrintJob::new("alice", "J1", 5, 3);
        assert_eq!(job.waiting_time(3), 0);
        assert_eq!(job.waiting_time(10), 7);
    }

    #[test]
    fn identifiers_serialize_as_plain_strings() {
        let job = PrintJob::new("", "J1", -2, 0);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["user_id"], "");
        assert_eq!(value["job_id"], "J1");
        assert_eq!(value["priority"], -2);
    }

    #[test]
    fn request_priority_defaults_when_missing() {
        let req: JobRequest =
            serde_json::from_str(r#"{"user_id":"bob","job_id":"J9"}"#).unwrap();
        assert_eq!(req.priority, Priority(0));
    }
}
