//! Queue configuration.

use serde::{Deserialize, Serialize};

use crate::QueueError;

/// Configuration for a print queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum waiting time (inclusive, in ticks) before a job expires.
    ///
    /// Signed so that a negative value can be rejected at construction
    /// instead of being silently accepted.
    pub expiry_threshold: i64,
    /// Advance the clock automatically every N milliseconds when hosted by
    /// an actor. `None` means the clock only moves on explicit requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
    /// Capacity of the event broadcast channel.
    pub event_buffer: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            expiry_threshold: 10,
            tick_interval_ms: None,
            event_buffer: 1024,
        }
    }
}

impl QueueConfig {
    /// Config with the given expiry threshold and defaults otherwise.
    pub fn with_threshold(expiry_threshold: i64) -> Self {
        Self {
            expiry_threshold,
            ..Default::default()
        }
    }

    /// Set the automatic tick interval.
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = Some(interval_ms);
        self
    }

    /// Set the event channel capacity.
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Check the config, returning the threshold as an unsigned tick count.
    pub fn validate(&self) -> Result<u64, QueueError> {
        if self.event_buffer == 0 {
            return Err(QueueError::InvalidConfiguration(
                "event_buffer must be greater than zero".into(),
            ));
        }
        if self.tick_interval_ms == Some(0) {
            return Err(QueueError::InvalidConfiguration(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        u64::try_from(self.expiry_threshold).map_err(|_| {
            QueueError::InvalidConfiguration(format!(
                "expiry_threshold must be non-negative, got {}",
                self.expiry_threshold
            ))
        })
    }

    /// Build a config from environment variables.
    ///
    /// - `PRINT_QUEUE_EXPIRY_THRESHOLD` (default: `10`)
    /// - `PRINT_QUEUE_TICK_INTERVAL_MS` (optional; unset or empty disables auto-ticking)
    /// - `PRINT_QUEUE_EVENT_BUFFER` (default: `1024`)
    pub fn from_env() -> Result<Self, QueueError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let expiry_threshold = parse_var(&lookup, "PRINT_QUEUE_EXPIRY_THRESHOLD")?
            .unwrap_or(defaults.expiry_threshold);
        let tick_interval_ms = parse_var(&lookup, "PRINT_QUEUE_TICK_INTERVAL_MS")?;
        let event_buffer =
            parse_var(&lookup, "PRINT_QUEUE_EVENT_BUFFER")?.unwrap_or(defaults.event_buffer);

        let cfg = Self {
            expiry_threshold,
            tick_interval_ms,
            event_buffer,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, QueueError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| QueueError::InvalidConfiguration(format!("invalid {name}={raw}: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = QueueConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, QueueConfig::default());
        assert_eq!(cfg.validate(), Ok(10));
    }

    #[test]
    fn reads_all_variables() {
        let cfg = QueueConfig::from_lookup(lookup(&[
            ("PRINT_QUEUE_EXPIRY_THRESHOLD", "3"),
            ("PRINT_QUEUE_TICK_INTERVAL_MS", " 250 "),
            ("PRINT_QUEUE_EVENT_BUFFER", "16"),
        ]))
        .unwrap();
        assert_eq!(cfg.expiry_threshold, 3);
        assert_eq!(cfg.tick_interval_ms, Some(250));
        assert_eq!(cfg.event_buffer, 16);
    }

    #[test]
    fn empty_interval_disables_auto_tick() {
        let cfg =
            QueueConfig::from_lookup(lookup(&[("PRINT_QUEUE_TICK_INTERVAL_MS", "")])).unwrap();
        assert_eq!(cfg.tick_interval_ms, None);
    }

    #[test]
    fn rejects_negative_threshold() {
        let err = QueueConfig::from_lookup(lookup(&[("PRINT_QUEUE_EXPIRY_THRESHOLD", "-1")]))
            .unwrap_err();
        assert!(matches!(err, QueueError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_garbage_values() {
        let err = QueueConfig::from_lookup(lookup(&[("PRINT_QUEUE_EVENT_BUFFER", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("PRINT_QUEUE_EVENT_BUFFER"));
    }

    #[test]
    fn rejects_zero_capacity_and_interval() {
        assert!(QueueConfig::default().with_event_buffer(0).validate().is_err());
        assert!(QueueConfig::default().with_tick_interval_ms(0).validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let cfg: QueueConfig = serde_json::from_str(r#"{"expiry_threshold":0}"#).unwrap();
        assert_eq!(cfg.expiry_threshold, 0);
        assert_eq!(cfg.event_buffer, 1024);
        assert_eq!(cfg.tick_interval_ms, None);
    }
}
