//! Core domain types for the print queue.
//!
//! This crate contains the synchronous job-lifecycle engine shared by all
//! packages:
//! - `PrintJob` and its identifiers
//! - `QueueManager`, which owns the live jobs and the logical clock
//! - Events and sinks for the reporting side
//! - Configuration, errors and statistics

mod config;
mod error;
mod events;
mod job;
mod queue;
mod sink;
mod stats;

pub use config::QueueConfig;
pub use error::QueueError;
pub use events::{
    AdvanceOutcome, ExpiredEvent, QueueEvent, StatusLine, SubmittedEvent, TickEvent,
};
pub use job::{JobId, JobRequest, PrintJob, Priority, UserId};
pub use queue::QueueManager;
pub use sink::{EventSink, FnSink, RecordingSink, TracingSink};
pub use stats::QueueStats;
