//! Reporting sinks that receive queue events.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::QueueEvent;

/// Receiver of structured queue events.
///
/// The manager calls `emit` synchronously, in emission order, before the
/// operation that produced the event returns.
pub trait EventSink: Send {
    fn emit(&mut self, event: &QueueEvent);
}

impl EventSink for Vec<QueueEvent> {
    fn emit(&mut self, event: &QueueEvent) {
        self.push(event.clone());
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    queue: Option<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag log lines with a queue name.
    pub fn named(queue: impl Into<String>) -> Self {
        Self {
            queue: Some(queue.into()),
        }
    }

    /// Queue name attached to log lines, if any.
    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }
}

impl EventSink for TracingSink {
    fn emit(&mut self, event: &QueueEvent) {
        let queue = self.queue().unwrap_or("-");
        match event {
            QueueEvent::Expired(_) => tracing::info!(queue, "{}", event.description()),
            _ => tracing::debug!(queue, "{}", event.description()),
        }
    }
}

/// A closure-based sink.
pub struct FnSink<F>
where
    F: FnMut(&QueueEvent) + Send,
{
    callback: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&QueueEvent) + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(&QueueEvent) + Send,
{
    fn emit(&mut self, event: &QueueEvent) {
        (self.callback)(event)
    }
}

/// Collects events into a buffer that stays readable after the sink has
/// been handed to a manager.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<QueueEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<QueueEvent> {
        self.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<QueueEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QueueEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &QueueEvent) {
        self.lock().push(event.clone());
    }
}
