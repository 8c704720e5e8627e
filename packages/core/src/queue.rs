//! The queue manager: job records, logical clock and expiry sweep.

use crate::{
    AdvanceOutcome, EventSink, ExpiredEvent, JobId, JobRequest, PrintJob, Priority, QueueConfig,
    QueueError, QueueEvent, QueueStats, StatusLine, SubmittedEvent, TickEvent, UserId,
};

/// Owns the live jobs of one print queue and its logical clock.
///
/// Every operation runs to completion synchronously. The manager has no
/// internal locking; callers that share it across tasks must serialize
/// access themselves (see the `actors` crate).
pub struct QueueManager {
    /// Live jobs, oldest submission first.
    jobs: Vec<PrintJob>,
    clock: u64,
    expiry_threshold: u64,
    submitted_total: u64,
    expired_total: u64,
    sink: Option<Box<dyn EventSink>>,
}

impl QueueManager {
    /// Create an empty manager at clock 0.
    ///
    /// Fails with [`QueueError::InvalidConfiguration`] for a negative threshold.
    pub fn new(expiry_threshold: i64) -> Result<Self, QueueError> {
        Self::from_config(&QueueConfig::with_threshold(expiry_threshold))
    }

    /// Create an empty manager from a full configuration.
    pub fn from_config(config: &QueueConfig) -> Result<Self, QueueError> {
        let expiry_threshold = config.validate()?;
        tracing::debug!(expiry_threshold, "Created queue manager");
        Ok(Self {
            jobs: Vec::new(),
            clock: 0,
            expiry_threshold,
            submitted_total: 0,
            expired_total: 0,
            sink: None,
        })
    }

    /// Attach a reporting sink. Replaces any previous sink.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn expiry_threshold(&self) -> u64 {
        self.expiry_threshold
    }

    /// Number of live jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn emit(&mut self, event: QueueEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(&event);
        }
    }

    /// Append a job stamped with the current clock. Always succeeds.
    pub fn submit(
        &mut self,
        user_id: impl Into<UserId>,
        job_id: impl Into<JobId>,
        priority: impl Into<Priority>,
    ) -> SubmittedEvent {
        let job = PrintJob::new(user_id, job_id, priority, self.clock);
        let event = SubmittedEvent {
            job_id: job.job_id.clone(),
            user_id: job.user_id.clone(),
            priority: job.priority,
        };
        self.jobs.push(job);
        self.submitted_total += 1;
        self.emit(event.clone().into());
        event
    }

    /// Submit several jobs at the current clock, in iteration order.
    pub fn submit_batch<I>(&mut self, requests: I) -> Vec<SubmittedEvent>
    where
        I: IntoIterator<Item = JobRequest>,
    {
        requests
            .into_iter()
            .map(|req| self.submit(req.user_id, req.job_id, req.priority))
            .collect()
    }

    /// Move the clock forward one tick, then sweep expired jobs.
    pub fn advance(&mut self) -> AdvanceOutcome {
        self.clock += 1;
        let tick = TickEvent { clock: self.clock };
        self.emit(tick.into());
        let expired = self.sweep();
        AdvanceOutcome { tick, expired }
    }

    /// Remove every job whose waiting time is strictly greater than the
    /// threshold. Survivors keep their relative order.
    ///
    /// Called by [`advance`](Self::advance); public so the sweep can be
    /// exercised on its own.
    pub fn sweep(&mut self) -> Vec<ExpiredEvent> {
        let clock = self.clock;
        let threshold = self.expiry_threshold;

        let (expired, retained): (Vec<PrintJob>, Vec<PrintJob>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|job| job.waiting_time(clock) > threshold);
        self.jobs = retained;

        let events: Vec<ExpiredEvent> = expired
            .into_iter()
            .map(|job| ExpiredEvent {
                waiting_time: job.waiting_time(clock),
                job_id: job.job_id,
                user_id: job.user_id,
            })
            .collect();

        self.expired_total += events.len() as u64;
        for event in &events {
            self.emit(event.clone().into());
        }
        events
    }

    /// Current view of every live job, oldest submission first.
    pub fn snapshot(&self) -> Vec<StatusLine> {
        self.jobs.iter().map(|job| self.status_line(job)).collect()
    }

    /// The oldest live job carrying `job_id`, if any.
    pub fn find(&self, job_id: &JobId) -> Option<StatusLine> {
        self.jobs
            .iter()
            .find(|job| &job.job_id == job_id)
            .map(|job| self.status_line(job))
    }

    /// Aggregate statistics at the current clock.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            clock: self.clock,
            expiry_threshold: self.expiry_threshold,
            submitted_total: self.submitted_total,
            expired_total: self.expired_total,
            ..Default::default()
        }
        .with_snapshot(&self.snapshot())
    }

    fn status_line(&self, job: &PrintJob) -> StatusLine {
        StatusLine {
            job_id: job.job_id.clone(),
            user_id: job.user_id.clone(),
            priority: job.priority,
            waiting_time: job.waiting_time(self.clock),
        }
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("jobs", &self.jobs)
            .field("clock", &self.clock)
            .field("expiry_threshold", &self.expiry_threshold)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
