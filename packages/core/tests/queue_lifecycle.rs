#![allow(clippy::disallowed_methods)]

use std::error::Error;

use print_queue_core::{
    ExpiredEvent, JobId, Priority, QueueConfig, QueueError, QueueEvent, QueueManager,
    RecordingSink, StatusLine, UserId,
};

fn line(job: &str, user: &str, priority: i32, waiting_time: u64) -> StatusLine {
    StatusLine {
        job_id: JobId::from(job),
        user_id: UserId::from(user),
        priority: Priority(priority),
        waiting_time,
    }
}

#[test]
fn end_to_end_scenario_with_threshold_ten() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(10)?;

    // Scenario 1: submit at clock 0
    queue.submit("alice", "J1", 5);
    assert_eq!(queue.snapshot(), vec![line("J1", "alice", 5, 0)]);

    // Scenario 2: ten ticks later the job is exactly at the threshold
    for _ in 0..10 {
        let out = queue.advance();
        assert!(out.expired.is_empty());
    }
    assert_eq!(queue.clock(), 10);
    assert_eq!(queue.snapshot(), vec![line("J1", "alice", 5, 10)]);

    // Scenario 3: one more tick expires it
    let out = queue.advance();
    assert_eq!(queue.clock(), 11);
    assert_eq!(
        out.expired,
        vec![ExpiredEvent {
            job_id: "J1".into(),
            user_id: "alice".into(),
            waiting_time: 11,
        }]
    );
    assert!(queue.snapshot().is_empty());

    // Scenario 4: priority does not reorder
    queue.submit("bob", "J2", 1);
    queue.submit("carol", "J3", 9);
    let ids: Vec<String> = queue
        .snapshot()
        .into_iter()
        .map(|l| l.job_id.to_string())
        .collect();
    assert_eq!(ids, vec!["J2", "J3"]);
    Ok(())
}

#[test]
fn zero_threshold_expires_on_next_tick() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(0)?;
    queue.submit("dave", "J4", 3);
    assert_eq!(queue.snapshot(), vec![line("J4", "dave", 3, 0)]);

    let out = queue.advance();
    assert_eq!(out.expired.len(), 1);
    assert_eq!(out.expired[0].waiting_time, 1);
    assert!(queue.is_empty());
    Ok(())
}

#[test]
fn invalid_configuration_is_reported() {
    assert!(matches!(
        QueueManager::new(-5),
        Err(QueueError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        QueueManager::from_config(&QueueConfig::with_threshold(-1)),
        Err(QueueError::InvalidConfiguration(_))
    ));
}

#[test]
fn clock_increases_by_one_per_advance() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(4)?;
    let mut previous = queue.clock();
    for n in 1..=25u64 {
        let out = queue.advance();
        assert_eq!(out.tick.clock, n);
        assert!(queue.clock() > previous);
        previous = queue.clock();
    }
    assert_eq!(queue.clock(), 25);
    Ok(())
}

#[test]
fn no_job_expires_before_its_deadline() -> Result<(), Box<dyn Error>> {
    let threshold = 3u64;
    let mut queue = QueueManager::new(threshold as i64)?;
    let mut submitted_at = Vec::new();

    for round in 0..12u64 {
        if round % 2 == 0 {
            let id = format!("job-{round}");
            queue.submit("user", id.as_str(), round as i32);
            submitted_at.push((id, queue.clock()));
        }
        let out = queue.advance();
        for expired in &out.expired {
            let (_, at) = submitted_at
                .iter()
                .find(|(id, _)| id == expired.job_id.as_str())
                .ok_or("expired job was never submitted")?;
            assert!(queue.clock() > at + threshold);
            assert_eq!(expired.waiting_time, queue.clock() - at);
        }
        for live in queue.snapshot() {
            assert!(live.waiting_time <= threshold);
        }
    }
    Ok(())
}

#[test]
fn snapshot_is_ordered_and_repeatable() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(2)?;
    queue.submit("u", "a", 9);
    queue.advance();
    queue.submit("u", "b", 1);
    queue.submit("u", "c", 5);
    queue.advance();
    queue.submit("u", "d", 0);
    queue.advance();

    let first = queue.snapshot();
    let second = queue.snapshot();
    assert_eq!(first, second);

    // "a" has waited 3 and is gone; the rest keep arrival order
    let ids: Vec<&str> = first.iter().map(|l| l.job_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "d"]);
    Ok(())
}

#[test]
fn empty_queue_ticks_quietly() -> Result<(), Box<dyn Error>> {
    let recorder = RecordingSink::new();
    let mut queue = QueueManager::new(1)?.with_sink(recorder.clone());
    for _ in 0..3 {
        queue.advance();
    }
    let events = recorder.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| matches!(e, QueueEvent::Tick(_))));
    Ok(())
}

#[test]
fn stats_track_lifetime_counters() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(0)?;
    queue.submit("a", "1", 1);
    queue.submit("b", "2", 1);
    queue.advance();
    queue.submit("c", "3", 2);

    let stats = queue.stats();
    assert_eq!(stats.submitted_total, 3);
    assert_eq!(stats.expired_total, 2);
    assert_eq!(stats.total_jobs, 1);
    assert_eq!(stats.expiry_rate().map(|r| r.round()), Some(67.0));
    Ok(())
}

#[test]
fn empty_identifiers_are_tracked_and_expire() -> Result<(), Box<dyn Error>> {
    let mut queue = QueueManager::new(1)?;
    queue.submit("", "", 0);
    queue.submit("", "", 0);

    assert_eq!(queue.len(), 2);
    assert_eq!(queue.snapshot(), vec![line("", "", 0, 0), line("", "", 0, 0)]);

    assert!(queue.advance().expired.is_empty());
    let out = queue.advance();
    assert_eq!(queue.clock(), 2);
    assert_eq!(out.expired.len(), 2);
    assert!(out.expired.iter().all(|e| e.job_id.as_str().is_empty() && e.waiting_time == 2));

    assert!(queue.advance().expired.is_empty());
    assert!(queue.is_empty());
    Ok(())
}
