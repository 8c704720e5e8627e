//! Queue actor that owns a single print queue.
//!
//! The actor's mailbox is the one lock guarding the manager: every message
//! is handled to completion before the next one is looked at, so callers on
//! different tasks never observe a half-applied submit or sweep.

use std::time::Duration;

use print_queue_core::{
    AdvanceOutcome, EventSink, QueueConfig, QueueEvent, QueueManager, TracingSink,
};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::messages::{QueueEnvelope, QueueInfo, QueueMessage, SupervisorMessage};

/// Forwards manager events to the broadcast channel and/or the supervisor.
struct EnvelopeSink {
    queue: String,
    log: TracingSink,
    event_tx: Option<broadcast::Sender<QueueEnvelope>>,
    supervisor: Option<ActorRef<SupervisorMessage>>,
}

impl EventSink for EnvelopeSink {
    fn emit(&mut self, event: &QueueEvent) {
        self.log.emit(event);

        let envelope = QueueEnvelope {
            queue: self.queue.clone(),
            event: event.clone(),
        };
        if let Some(ref tx) = self.event_tx {
            // No receivers is not an error.
            let _ = tx.send(envelope.clone());
        }
        if let Some(ref supervisor) = self.supervisor {
            let _ = supervisor.send_message(SupervisorMessage::BroadcastEvent { envelope });
        }
    }
}

/// Startup arguments for the queue actor.
pub struct QueueActorArgs {
    /// Queue name used in logs and event envelopes.
    pub name: String,
    /// Queue configuration.
    pub config: QueueConfig,
    event_tx: Option<broadcast::Sender<QueueEnvelope>>,
    supervisor: Option<ActorRef<SupervisorMessage>>,
}

impl QueueActorArgs {
    pub fn new(name: impl Into<String>, config: QueueConfig) -> Self {
        Self {
            name: name.into(),
            config,
            event_tx: None,
            supervisor: None,
        }
    }

    /// Set the supervisor reference.
    pub fn with_supervisor(mut self, supervisor: ActorRef<SupervisorMessage>) -> Self {
        self.supervisor = Some(supervisor);
        self
    }

    /// Set the event broadcaster.
    pub fn with_event_tx(mut self, tx: broadcast::Sender<QueueEnvelope>) -> Self {
        self.event_tx = Some(tx);
        self
    }
}

/// State for the queue actor.
pub struct QueueActorState {
    name: String,
    manager: QueueManager,
    ticker: Option<JoinHandle<()>>,
}

impl QueueActorState {
    fn info(&self) -> QueueInfo {
        QueueInfo {
            name: self.name.clone(),
            stats: self.manager.stats(),
        }
    }

    fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.manager.advance();
        if !outcome.expired.is_empty() {
            tracing::debug!(
                queue = %self.name,
                clock = outcome.tick.clock,
                "{} job(s) expired",
                outcome.expired.len()
            );
        }
        outcome
    }
}

fn spawn_ticker(myself: ActorRef<QueueMessage>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if myself.send_message(QueueMessage::Tick).is_err() {
                break;
            }
        }
    })
}

/// Queue actor that manages a single print queue.
pub struct QueueActor;

impl Actor for QueueActor {
    type Msg = QueueMessage;
    type State = QueueActorState;
    type Arguments = QueueActorArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            "Starting queue actor: {} (expiry threshold {})",
            args.name,
            args.config.expiry_threshold
        );

        let sink = EnvelopeSink {
            queue: args.name.clone(),
            log: TracingSink::named(args.name.clone()),
            event_tx: args.event_tx,
            supervisor: args.supervisor,
        };
        let manager = QueueManager::from_config(&args.config)?.with_sink(sink);

        let ticker = args
            .config
            .tick_interval_ms
            .map(|ms| spawn_ticker(myself.clone(), Duration::from_millis(ms)));

        Ok(QueueActorState {
            name: args.name,
            manager,
            ticker,
        })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        tracing::info!(
            "Queue actor stopped: {} ({} live jobs)",
            state.name,
            state.manager.len()
        );
        Ok(())
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            QueueMessage::Submit { request, reply } => {
                let event = state
                    .manager
                    .submit(request.user_id, request.job_id, request.priority);
                let _ = reply.send(event);
            }

            QueueMessage::SubmitBatch { requests, reply } => {
                let events = state.manager.submit_batch(requests);
                let _ = reply.send(events);
            }

            QueueMessage::Advance { reply } => {
                let outcome = state.advance();
                let _ = reply.send(outcome);
            }

            QueueMessage::Snapshot { reply } => {
                let _ = reply.send(state.manager.snapshot());
            }

            QueueMessage::GetJob { job_id, reply } => {
                let _ = reply.send(state.manager.find(&job_id));
            }

            QueueMessage::GetStats { reply } => {
                let _ = reply.send(state.manager.stats());
            }

            QueueMessage::GetInfo { reply } => {
                let _ = reply.send(state.info());
            }

            QueueMessage::Tick => {
                state.advance();
            }

            QueueMessage::Shutdown => {
                tracing::info!("Shutting down queue: {}", state.name);
                myself.stop(None);
            }
        }

        Ok(())
    }
}

/// Spawn a standalone queue actor, outside any supervisor.
pub async fn start_queue(
    args: QueueActorArgs,
) -> Result<(ActorRef<QueueMessage>, JoinHandle<()>), ractor::SpawnErr> {
    Actor::spawn(None, QueueActor, args).await
}
