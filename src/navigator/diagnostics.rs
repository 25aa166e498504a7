use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::screen::Channel;
use crate::stacks::{StackChange, StackObserver};

/// Logs channel changes for observability/debugging.
pub struct StackLogObserver {
    logger: Logger,
    level: LogLevel,
    target: String,
    log_full_screen: bool,
    log_dialogs: bool,
    log_popups: bool,
}

impl StackLogObserver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            target: "room_nav::navigator.stacks".to_string(),
            log_full_screen: true,
            log_dialogs: true,
            log_popups: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn log_full_screen(mut self, enabled: bool) -> Self {
        self.log_full_screen = enabled;
        self
    }

    pub fn log_dialogs(mut self, enabled: bool) -> Self {
        self.log_dialogs = enabled;
        self
    }

    pub fn log_popups(mut self, enabled: bool) -> Self {
        self.log_popups = enabled;
        self
    }

    fn wants(&self, channel: Channel) -> bool {
        match channel {
            Channel::FullScreen => self.log_full_screen,
            Channel::Dialog => self.log_dialogs,
            Channel::Popup => self.log_popups,
        }
    }
}

impl StackObserver for StackLogObserver {
    fn on_stack_changed(&mut self, change: &StackChange) {
        if !self.wants(change.channel) {
            return;
        }
        let event = event_with_fields(
            self.level,
            &self.target,
            "stack_changed",
            [
                json_kv("channel", change.channel.as_str()),
                json_kv("previous", json!(change.previous)),
                json_kv("current", json!(change.current)),
                json_kv("added", json!(change.added_keys())),
                json_kv("removed", json!(change.removed_keys())),
            ],
        );
        let _ = self.logger.log_event(event);
    }
}
