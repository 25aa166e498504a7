use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;

/// Counters describing what a navigator has done so far.
#[derive(Debug, Default, Clone)]
pub struct NavigatorMetrics {
    commands_applied: u64,
    commands_rejected: u64,
    commands_failed: u64,
    screens_registered: u64,
    screens_released: u64,
    exits_requested: u64,
}

impl NavigatorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_applied(&mut self) {
        self.commands_applied = self.commands_applied.saturating_add(1);
    }

    pub fn record_rejected(&mut self) {
        self.commands_rejected = self.commands_rejected.saturating_add(1);
    }

    pub fn record_failed(&mut self) {
        self.commands_failed = self.commands_failed.saturating_add(1);
    }

    pub fn record_registered(&mut self) {
        self.screens_registered = self.screens_registered.saturating_add(1);
    }

    pub fn record_released(&mut self, count: usize) {
        if count > 0 {
            self.screens_released = self.screens_released.saturating_add(count as u64);
        }
    }

    pub fn record_exit(&mut self) {
        self.exits_requested = self.exits_requested.saturating_add(1);
    }

    pub fn snapshot(&self, live_screens: usize) -> MetricSnapshot {
        MetricSnapshot {
            live_screens: live_screens as u64,
            commands_applied: self.commands_applied,
            commands_rejected: self.commands_rejected,
            commands_failed: self.commands_failed,
            screens_registered: self.screens_registered,
            screens_released: self.screens_released,
            exits_requested: self.exits_requested,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub live_screens: u64,
    pub commands_applied: u64,
    pub commands_rejected: u64,
    pub commands_failed: u64,
    pub screens_registered: u64,
    pub screens_released: u64,
    pub exits_requested: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "navigator_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("live_screens".to_string(), json!(self.live_screens));
        map.insert("commands_applied".to_string(), json!(self.commands_applied));
        map.insert("commands_rejected".to_string(), json!(self.commands_rejected));
        map.insert("commands_failed".to_string(), json!(self.commands_failed));
        map.insert("screens_registered".to_string(), json!(self.screens_registered));
        map.insert("screens_released".to_string(), json!(self.screens_released));
        map.insert("exits_requested".to_string(), json!(self.exits_requested));
        map
    }
}
