//! Message types for actor communication.

use print_queue_core::{
    AdvanceOutcome, JobId, JobRequest, QueueConfig, QueueError, QueueEvent, QueueStats,
    StatusLine, SubmittedEvent,
};
use ractor::{ActorRef, RpcReplyPort};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A queue event tagged with the name of the queue that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEnvelope {
    pub queue: String,
    #[serde(flatten)]
    pub event: QueueEvent,
}

/// Name and statistics of a hosted queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub name: String,
    pub stats: QueueStats,
}

/// Messages for the QueueActor.
#[derive(Debug)]
pub enum QueueMessage {
    /// Submit a job at the current clock.
    Submit {
        request: JobRequest,
        reply: RpcReplyPort<SubmittedEvent>,
    },

    /// Submit several jobs at the current clock.
    SubmitBatch {
        requests: Vec<JobRequest>,
        reply: RpcReplyPort<Vec<SubmittedEvent>>,
    },

    /// Advance the clock one tick and sweep.
    Advance { reply: RpcReplyPort<AdvanceOutcome> },

    /// List live jobs with their waiting times.
    Snapshot { reply: RpcReplyPort<Vec<StatusLine>> },

    /// Look up the oldest live job with an ID.
    GetJob {
        job_id: JobId,
        reply: RpcReplyPort<Option<StatusLine>>,
    },

    /// Get queue stats.
    GetStats { reply: RpcReplyPort<QueueStats> },

    /// Get queue info.
    GetInfo { reply: RpcReplyPort<QueueInfo> },

    /// Timer-driven advance, no reply.
    Tick,

    /// Stop the queue.
    Shutdown,
}

/// Messages for the Supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Create a new named queue.
    CreateQueue {
        name: String,
        config: QueueConfig,
        reply: RpcReplyPort<Result<ActorRef<QueueMessage>, ActorError>>,
    },

    /// Get a queue by name.
    GetQueue {
        name: String,
        reply: RpcReplyPort<Option<ActorRef<QueueMessage>>>,
    },

    /// List all queues.
    ListQueues { reply: RpcReplyPort<Vec<QueueInfo>> },

    /// Stop and forget a queue.
    DeleteQueue {
        name: String,
        reply: RpcReplyPort<Result<(), ActorError>>,
    },

    /// Subscribe to events from every queue.
    Subscribe {
        sender: broadcast::Sender<QueueEnvelope>,
    },

    /// Broadcast an event to all subscribers.
    BroadcastEvent { envelope: QueueEnvelope },

    /// Shutdown all queues.
    Shutdown,
}

/// Result type for actor operations.
pub type ActorResult<T> = Result<T, ActorError>;

/// Error type for actor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    #[error("Queue already exists: {0}")]
    QueueExists(String),

    #[error(transparent)]
    Config(#[from] QueueError),

    #[error("Actor error: {0}")]
    Actor(String),
}
