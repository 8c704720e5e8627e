//! Aggregate statistics over a queue's live jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Priority, StatusLine};

/// Point-in-time statistics for a queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStats {
    /// Current logical clock.
    pub clock: u64,
    /// Configured expiry threshold.
    pub expiry_threshold: u64,
    /// Number of live jobs.
    pub total_jobs: usize,
    /// Mean waiting time of live jobs, `0.0` when empty.
    pub avg_wait_time: f64,
    /// Longest waiting time among live jobs, `0` when empty.
    pub max_wait_time: u64,
    /// Live job count per priority.
    pub priority_distribution: BTreeMap<Priority, usize>,
    /// Jobs submitted since construction.
    pub submitted_total: u64,
    /// Jobs expired since construction.
    pub expired_total: u64,
}

impl QueueStats {
    /// Fill the live-job fields from a snapshot.
    pub(crate) fn with_snapshot(mut self, lines: &[StatusLine]) -> Self {
        self.total_jobs = lines.len();
        self.max_wait_time = lines.iter().map(|l| l.waiting_time).max().unwrap_or(0);
        self.avg_wait_time = if lines.is_empty() {
            0.0
        } else {
            lines.iter().map(|l| l.waiting_time as f64).sum::<f64>() / lines.len() as f64
        };
        self.priority_distribution = BTreeMap::new();
        for line in lines {
            *self.priority_distribution.entry(line.priority).or_insert(0) += 1;
        }
        self
    }

    /// Share of submitted jobs that expired, as a percentage.
    pub fn expiry_rate(&self) -> Option<f64> {
        if self.submitted_total == 0 {
            None
        } else {
            Some((self.expired_total as f64 / self.submitted_total as f64) * 100.0)
        }
    }

    /// Ticks left before the oldest live job becomes eligible for expiry.
    pub fn headroom(&self) -> Option<u64> {
        if self.total_jobs == 0 {
            None
        } else {
            Some(self.expiry_threshold.saturating_sub(self.max_wait_time))
        }
    }
}
