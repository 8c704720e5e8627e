//! Supervisor actor that hosts any number of named print queues.

use std::collections::BTreeMap;

use print_queue_core::QueueConfig;
use ractor::{Actor, ActorProcessingErr, ActorRef, SupervisionEvent};
use tokio::sync::broadcast;

use crate::messages::{ActorError, QueueEnvelope, QueueInfo, QueueMessage, SupervisorMessage};
use crate::queue_actor::{QueueActor, QueueActorArgs};

/// State for the supervisor actor.
pub struct SupervisorState {
    /// Queue actors by name.
    pub queues: BTreeMap<String, ActorRef<QueueMessage>>,
    /// Event broadcaster shared by all queues.
    pub event_tx: broadcast::Sender<QueueEnvelope>,
}

impl SupervisorState {
    /// Create a new supervisor state with the given event channel capacity.
    pub fn new(event_buffer: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_buffer);
        Self {
            queues: BTreeMap::new(),
            event_tx,
        }
    }
}

async fn spawn_queue_actor(
    myself: ActorRef<SupervisorMessage>,
    state: &mut SupervisorState,
    name: String,
    config: QueueConfig,
) -> Result<ActorRef<QueueMessage>, ActorError> {
    config.validate()?;

    let args = QueueActorArgs::new(name.clone(), config).with_supervisor(myself.clone());
    let (actor, _handle) = Actor::spawn_linked(None, QueueActor, args, myself.get_cell())
        .await
        .map_err(|e| ActorError::Actor(format!("Failed to spawn queue: {}", e)))?;

    state.queues.insert(name, actor.clone());
    Ok(actor)
}

/// Supervisor actor that manages all queues.
pub struct Supervisor;

impl Actor for Supervisor {
    type Msg = SupervisorMessage;
    type State = SupervisorState;
    type Arguments = usize;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        event_buffer: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        if event_buffer == 0 {
            return Err(ActorError::Actor("event buffer must be greater than zero".into()).into());
        }
        tracing::info!("Starting print queue supervisor");
        Ok(SupervisorState::new(event_buffer))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisorMessage::CreateQueue {
                name,
                config,
                reply,
            } => {
                if state.queues.contains_key(&name) {
                    let _ = reply.send(Err(ActorError::QueueExists(name)));
                    return Ok(());
                }

                let result = spawn_queue_actor(myself.clone(), state, name.clone(), config).await;
                match &result {
                    Ok(_) => tracing::info!("Created queue '{}'", name),
                    Err(e) => tracing::warn!("Failed to create queue '{}': {}", name, e),
                }
                let _ = reply.send(result);
            }

            SupervisorMessage::GetQueue { name, reply } => {
                let _ = reply.send(state.queues.get(&name).cloned());
            }

            SupervisorMessage::ListQueues { reply } => {
                let mut queues = Vec::new();
                for queue_ref in state.queues.values() {
                    let (tx, rx) = ractor::concurrency::oneshot();
                    if queue_ref
                        .send_message(QueueMessage::GetInfo { reply: tx.into() })
                        .is_ok()
                        && let Ok(info) = rx.await
                    {
                        queues.push(info);
                    }
                }
                let _ = reply.send(queues);
            }

            SupervisorMessage::DeleteQueue { name, reply } => {
                if let Some(queue_ref) = state.queues.remove(&name) {
                    if let Err(e) = queue_ref.send_message(QueueMessage::Shutdown) {
                        tracing::warn!("Queue '{}' was already stopped: {}", name, e);
                    }
                    tracing::info!("Deleted queue '{}'", name);
                    let _ = reply.send(Ok(()));
                } else {
                    let _ = reply.send(Err(ActorError::QueueNotFound(name)));
                }
            }

            SupervisorMessage::Subscribe { sender } => {
                // Subscribe now so nothing broadcast after this message is missed.
                let mut rx = state.event_tx.subscribe();
                tokio::spawn(async move {
                    loop {
                        match rx.recv().await {
                            Ok(envelope) => {
                                if sender.send(envelope).is_err() {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                tracing::warn!("Event subscriber lagged by {} events", skipped);
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                });
            }

            SupervisorMessage::BroadcastEvent { envelope } => {
                let _ = state.event_tx.send(envelope);
            }

            SupervisorMessage::Shutdown => {
                tracing::info!("Shutting down supervisor");
                for queue_ref in state.queues.values() {
                    let _ = queue_ref.send_message(QueueMessage::Shutdown);
                }
                state.queues.clear();
                myself.stop(None);
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisionEvent::ActorTerminated(cell, _, reason) => {
                tracing::debug!("Queue actor {} terminated: {:?}", cell.get_id(), reason);
                state.queues.retain(|_, q| q.get_id() != cell.get_id());
            }
            SupervisionEvent::ActorFailed(cell, err) => {
                tracing::warn!("Queue actor {} failed: {}", cell.get_id(), err);
                state.queues.retain(|_, q| q.get_id() != cell.get_id());
            }
            _ => {}
        }
        Ok(())
    }
}

/// Start the supervisor with the given event channel capacity.
pub async fn start_supervisor(
    event_buffer: usize,
) -> Result<(ActorRef<SupervisorMessage>, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
    Actor::spawn(None, Supervisor, event_buffer).await
}
