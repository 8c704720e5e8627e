//! Turns queue events and snapshots into console output.

use print_queue_core::{
    ExpiredEvent, JobId, QueueEvent, QueueStats, StatusLine, SubmittedEvent, TickEvent,
};
use serde_json::json;

/// Output style for the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Format {
    pub fn submitted(self, event: &SubmittedEvent) -> Result<String, serde_json::Error> {
        match self {
            Format::Text => Ok(format!(
                "Enqueued: (User: {}, Job: {}, Priority: {})",
                event.user_id, event.job_id, event.priority
            )),
            Format::Json => serde_json::to_string(&QueueEvent::Submitted(event.clone())),
        }
    }

    pub fn tick(self, event: &TickEvent) -> Result<String, serde_json::Error> {
        match self {
            Format::Text => Ok(format!("Tick: clock = {}", event.clock)),
            Format::Json => serde_json::to_string(&QueueEvent::Tick(*event)),
        }
    }

    pub fn expired(self, event: &ExpiredEvent) -> Result<String, serde_json::Error> {
        match self {
            Format::Text => Ok(format!(
                "Expired: (User: {}, Job: {}, Waited: {} ticks)",
                event.user_id, event.job_id, event.waiting_time
            )),
            Format::Json => serde_json::to_string(&QueueEvent::Expired(event.clone())),
        }
    }

    pub fn status(self, lines: &[StatusLine]) -> Result<Vec<String>, serde_json::Error> {
        match self {
            Format::Text => {
                let mut out = vec!["Queue Status:".to_string()];
                if lines.is_empty() {
                    out.push("  Empty".to_string());
                }
                out.extend(lines.iter().map(|l| format!("  {}", status_text(l))));
                Ok(out)
            }
            Format::Json => Ok(vec![serde_json::to_string(&json!({ "status": lines }))?]),
        }
    }

    pub fn stats(self, stats: &QueueStats) -> Result<Vec<String>, serde_json::Error> {
        match self {
            Format::Text => {
                let distribution = stats
                    .priority_distribution
                    .iter()
                    .map(|(priority, count)| format!("{priority}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(vec![
                    "Queue Stats:".to_string(),
                    format!("  Clock: {}", stats.clock),
                    format!("  Expiry threshold: {}", stats.expiry_threshold),
                    format!("  Live jobs: {}", stats.total_jobs),
                    format!("  Average wait: {:.2} ticks", stats.avg_wait_time),
                    format!("  Longest wait: {} ticks", stats.max_wait_time),
                    format!("  Priorities: {{{distribution}}}"),
                    format!(
                        "  Submitted: {}, Expired: {}",
                        stats.submitted_total, stats.expired_total
                    ),
                ])
            }
            Format::Json => Ok(vec![serde_json::to_string(&json!({ "stats": stats }))?]),
        }
    }

    pub fn found(
        self,
        job_id: &JobId,
        line: Option<&StatusLine>,
    ) -> Result<String, serde_json::Error> {
        match self {
            Format::Text => Ok(match line {
                Some(l) => format!("Found: {}", status_text(l)),
                None => format!("Not found: {job_id}"),
            }),
            Format::Json => serde_json::to_string(&json!({ "job_id": job_id, "found": line })),
        }
    }
}

fn status_text(line: &StatusLine) -> String {
    format!(
        "(User: {}, Job: {}, Priority: {}, Waiting: {} ticks)",
        line.user_id, line.job_id, line.priority, line.waiting_time
    )
}
