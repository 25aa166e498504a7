//! Navigator audit hooks.
//!
//! Records capture a stage identifier plus structured metadata so owners can
//! buffer, log, or assert on the navigator's progression without wrapping
//! every call site.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `Navigator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorAuditStage {
    /// A new navigator instance was constructed.
    NavigatorConstructed,
    /// The delegate's admission gate refused a command.
    CommandRejected,
    /// A command was applied without error.
    CommandApplied,
    /// A command failed and was routed to the error hook.
    CommandFailed,
    /// A previously unseen key entered the registry.
    ScreenRegistered,
    /// A key left every channel and its registry entries were cleared.
    ScreenReleased,
    /// The navigator transitioned to `Exiting`.
    ExitRequested,
    /// A command arrived after exit and was dropped.
    CommandIgnoredAfterExit,
}

#[derive(Debug, Clone)]
pub struct NavigatorAuditEvent {
    pub timestamp: SystemTime,
    pub stage: NavigatorAuditStage,
    pub details: Vec<(String, Value)>,
}

impl NavigatorAuditEvent {
    fn new(stage: NavigatorAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct NavigatorAuditEventBuilder {
    event: NavigatorAuditEvent,
}

impl NavigatorAuditEventBuilder {
    pub fn new(stage: NavigatorAuditStage) -> Self {
        Self {
            event: NavigatorAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> NavigatorAuditEvent {
        self.event
    }
}

pub trait NavigatorAudit: Send + Sync {
    fn record(&self, event: NavigatorAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullNavigatorAudit;

impl NavigatorAudit for NullNavigatorAudit {
    fn record(&self, _event: NavigatorAuditEvent) {}
}

/// Buffers every event in memory.
#[derive(Debug, Default)]
pub struct BufferedNavigatorAudit {
    events: Mutex<Vec<NavigatorAuditEvent>>,
}

impl BufferedNavigatorAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigatorAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<NavigatorAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl NavigatorAudit for BufferedNavigatorAudit {
    fn record(&self, event: NavigatorAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let mut builder = NavigatorAuditEventBuilder::new(NavigatorAuditStage::CommandApplied);
        builder
            .detail("command", json!("forward"))
            .detail("key", json!("home"));
        let event = builder.finish();

        assert_eq!(event.stage, NavigatorAuditStage::CommandApplied);
        assert_eq!(event.detail("key"), Some(&json!("home")));
        assert!(event.detail("missing").is_none());
    }

    #[test]
    fn buffered_audit_keeps_order() {
        let audit = BufferedNavigatorAudit::new();
        audit.record(NavigatorAuditEventBuilder::new(NavigatorAuditStage::NavigatorConstructed).finish());
        audit.record(NavigatorAuditEventBuilder::new(NavigatorAuditStage::ExitRequested).finish());

        assert_eq!(
            audit.stages(),
            vec![
                NavigatorAuditStage::NavigatorConstructed,
                NavigatorAuditStage::ExitRequested
            ]
        );
    }
}
