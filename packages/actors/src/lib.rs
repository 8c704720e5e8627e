//! Actor system for the print queue.
//!
//! This crate hosts `QueueManager`s inside Ractor actors so several tasks
//! can share a queue safely.
//!
//! # Architecture
//!
//! - `Supervisor` - Top-level actor that owns named queue actors and fans
//!   their events out to subscribers
//! - `QueueActor` - Owns one queue manager; its mailbox serializes every
//!   submit, tick and snapshot
//!
//! # Usage
//!
//! ```ignore
//! use actors::{client, start_supervisor};
//! use print_queue_core::QueueConfig;
//!
//! let (supervisor, _handle) = start_supervisor(1024).await?;
//! let queue = client::create_queue(&supervisor, "lobby", QueueConfig::with_threshold(10)).await?;
//! client::submit(&queue, "alice", "J1", 5).await?;
//! let outcome = client::advance(&queue).await?;
//! ```

pub mod client;
mod messages;
mod queue_actor;
mod supervisor;

pub use messages::{
    ActorError, ActorResult, QueueEnvelope, QueueInfo, QueueMessage, SupervisorMessage,
};
pub use queue_actor::{QueueActor, QueueActorArgs, start_queue};
pub use supervisor::{Supervisor, start_supervisor};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
