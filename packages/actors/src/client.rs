//! Async request/reply helpers over the actor messages.
//!
//! Each helper sends one message with a oneshot reply port and awaits the
//! answer, mapping mailbox and reply failures to [`ActorError::Actor`].

use print_queue_core::{
    AdvanceOutcome, JobId, JobRequest, Priority, QueueConfig, QueueStats, StatusLine,
    SubmittedEvent, UserId,
};
use ractor::{ActorRef, Message, RpcReplyPort};
use tokio::sync::broadcast;

use crate::messages::{
    ActorError, ActorResult, QueueEnvelope, QueueInfo, QueueMessage, SupervisorMessage,
};

async fn request<M, T, F>(actor: &ActorRef<M>, build: F) -> ActorResult<T>
where
    M: Message,
    T: Send + 'static,
    F: FnOnce(RpcReplyPort<T>) -> M,
{
    let (tx, rx) = ractor::concurrency::oneshot();
    actor
        .send_message(build(tx.into()))
        .map_err(|e| ActorError::Actor(format!("Failed to send message: {}", e)))?;
    rx.await
        .map_err(|_| ActorError::Actor("Failed to receive response".into()))
}

/// Submit one job.
pub async fn submit(
    queue: &ActorRef<QueueMessage>,
    user_id: impl Into<UserId>,
    job_id: impl Into<JobId>,
    priority: impl Into<Priority>,
) -> ActorResult<SubmittedEvent> {
    let job = JobRequest::new(user_id, job_id, priority);
    request(queue, |reply| QueueMessage::Submit {
        request: job,
        reply,
    })
    .await
}

/// Submit several jobs at the same clock value.
pub async fn submit_batch(
    queue: &ActorRef<QueueMessage>,
    requests: Vec<JobRequest>,
) -> ActorResult<Vec<SubmittedEvent>> {
    request(queue, |reply| QueueMessage::SubmitBatch { requests, reply }).await
}

/// Advance the queue's clock one tick.
pub async fn advance(queue: &ActorRef<QueueMessage>) -> ActorResult<AdvanceOutcome> {
    request(queue, |reply| QueueMessage::Advance { reply }).await
}

/// Current live jobs.
pub async fn snapshot(queue: &ActorRef<QueueMessage>) -> ActorResult<Vec<StatusLine>> {
    request(queue, |reply| QueueMessage::Snapshot { reply }).await
}

/// Oldest live job with the given ID.
pub async fn find_job(
    queue: &ActorRef<QueueMessage>,
    job_id: impl Into<JobId>,
) -> ActorResult<Option<StatusLine>> {
    let job_id = job_id.into();
    request(queue, |reply| QueueMessage::GetJob { job_id, reply }).await
}

pub async fn stats(queue: &ActorRef<QueueMessage>) -> ActorResult<QueueStats> {
    request(queue, |reply| QueueMessage::GetStats { reply }).await
}

pub async fn info(queue: &ActorRef<QueueMessage>) -> ActorResult<QueueInfo> {
    request(queue, |reply| QueueMessage::GetInfo { reply }).await
}

/// Create a named queue under the supervisor.
pub async fn create_queue(
    supervisor: &ActorRef<SupervisorMessage>,
    name: impl Into<String>,
    config: QueueConfig,
) -> ActorResult<ActorRef<QueueMessage>> {
    let name = name.into();
    request(supervisor, |reply| SupervisorMessage::CreateQueue {
        name,
        config,
        reply,
    })
    .await?
}

pub async fn get_queue(
    supervisor: &ActorRef<SupervisorMessage>,
    name: impl Into<String>,
) -> ActorResult<ActorRef<QueueMessage>> {
    let name = name.into();
    let missing = name.clone();
    request(supervisor, |reply| SupervisorMessage::GetQueue { name, reply })
        .await?
        .ok_or(ActorError::QueueNotFound(missing))
}

pub async fn list_queues(supervisor: &ActorRef<SupervisorMessage>) -> ActorResult<Vec<QueueInfo>> {
    request(supervisor, |reply| SupervisorMessage::ListQueues { reply }).await
}

pub async fn delete_queue(
    supervisor: &ActorRef<SupervisorMessage>,
    name: impl Into<String>,
) -> ActorResult<()> {
    let name = name.into();
    request(supervisor, |reply| SupervisorMessage::DeleteQueue { name, reply }).await?
}

/// Subscribe to events from every queue under the supervisor.
///
/// Events broadcast after this call returns are delivered in order.
pub async fn subscribe(
    supervisor: &ActorRef<SupervisorMessage>,
    capacity: usize,
) -> ActorResult<broadcast::Receiver<QueueEnvelope>> {
    let (sender, receiver) = broadcast::channel(capacity.max(1));
    supervisor
        .send_message(SupervisorMessage::Subscribe { sender })
        .map_err(|e| ActorError::Actor(format!("Failed to send message: {}", e)))?;
    Ok(receiver)
}
