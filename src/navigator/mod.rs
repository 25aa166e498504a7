//! Navigation command processor.
//!
//! A [`Navigator`] owns the screen registry, the three channel stacks and the
//! back-handler registry, and applies batches of [`Command`]s against them.
//! Everything is synchronous: once [`Navigator::apply`] returns, the new
//! channel snapshots are visible and every [`StackObserver`] has been told
//! about them.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{NavigationError, Result};
use crate::handlers::BackHandlerRegistry;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, NavigatorMetrics};
use crate::registry::ScreenRegistry;
use crate::screen::{Channel, Destination, Screen, ScreenKey};
use crate::stacks::{ChannelStacks, StackObserver, StackSnapshot};

pub mod audit;
mod command;
mod contract;
pub mod diagnostics;
pub mod holder;
mod mutator;

pub use audit::{NavigatorAudit, NavigatorAuditEventBuilder, NavigatorAuditStage};
pub use command::{Command, CommandKind, TransitionDirection};
pub use contract::{NavigationDelegate, ScreenAdapter};

/// Configuration knobs for a navigator.
#[derive(Clone)]
pub struct NavigatorConfig {
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Target used for the navigator's own log events.
    pub log_target: String,
    /// Metrics accumulator shared with whoever wants snapshots.
    pub metrics: Option<Arc<Mutex<NavigatorMetrics>>>,
    /// Target used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Optional audit sink.
    pub audit: Option<Arc<dyn NavigatorAudit>>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            logger: None,
            log_target: "room_nav::navigator".to_string(),
            metrics: None,
            metrics_target: "room_nav::navigator.metrics".to_string(),
            audit: None,
        }
    }
}

impl NavigatorConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(NavigatorMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<NavigatorMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn NavigatorAudit>) -> Self {
        self.audit = Some(audit);
        self
    }
}

impl fmt::Debug for NavigatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorConfig")
            .field("logger", &self.logger.is_some())
            .field("log_target", &self.log_target)
            .field("metrics", &self.metrics.is_some())
            .field("metrics_target", &self.metrics_target)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigatorState {
    Active,
    /// Terminal. Commands arriving from here on are dropped.
    Exiting,
}

/// Serializable view of the navigator at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationSnapshot {
    pub state: NavigatorState,
    pub full_screen: StackSnapshot,
    pub dialogs: StackSnapshot,
    pub popups: StackSnapshot,
    pub visible: Option<ScreenKey>,
    pub last_command: Option<CommandKind>,
    pub back_handlers: Vec<ScreenKey>,
}

pub struct Navigator<S, C> {
    adapter: Box<dyn ScreenAdapter<S, C>>,
    delegate: Box<dyn NavigationDelegate<S, C>>,
    registry: ScreenRegistry<S, C>,
    stacks: ChannelStacks,
    back_handlers: BackHandlerRegistry,
    observers: Vec<Box<dyn StackObserver>>,
    config: NavigatorConfig,
    state: NavigatorState,
    last_command: Option<CommandKind>,
}

impl<S, C> Navigator<S, C>
where
    S: Screen + 'static,
    C: 'static,
{
    pub fn new<A, D>(adapter: A, delegate: D) -> Self
    where
        A: ScreenAdapter<S, C> + 'static,
        D: NavigationDelegate<S, C> + 'static,
    {
        Self::with_config(adapter, delegate, NavigatorConfig::default())
    }

    pub fn with_config<A, D>(adapter: A, delegate: D, config: NavigatorConfig) -> Self
    where
        A: ScreenAdapter<S, C> + 'static,
        D: NavigationDelegate<S, C> + 'static,
    {
        let navigator = Self {
            adapter: Box::new(adapter),
            delegate: Box::new(delegate),
            registry: ScreenRegistry::new(),
            stacks: ChannelStacks::new(),
            back_handlers: BackHandlerRegistry::new(),
            observers: Vec::new(),
            config,
            state: NavigatorState::Active,
            last_command: None,
        };
        navigator.audit(NavigatorAuditStage::NavigatorConstructed, std::iter::empty());
        navigator
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn add_observer<O>(&mut self, observer: O)
    where
        O: StackObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Apply `commands` strictly in order.
    ///
    /// A failing command is handed to [`NavigationDelegate::on_command_error`];
    /// whatever it already mutated stays mutated. If the hook re-raises, the
    /// error is returned and the rest of the batch is not applied.
    pub fn apply<I>(&mut self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = Command<S>>,
    {
        for command in commands {
            self.try_apply(command)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command<S>) -> Result<()> {
        self.try_apply(command)
    }

    fn try_apply(&mut self, command: Command<S>) -> Result<()> {
        let kind = command.kind();
        let key = command.screen_key().map(str::to_string);

        if self.state == NavigatorState::Exiting {
            self.log(
                LogLevel::Warn,
                "command_ignored_after_exit",
                command_fields(kind, key.as_deref()),
            );
            self.audit(
                NavigatorAuditStage::CommandIgnoredAfterExit,
                command_fields(kind, key.as_deref()),
            );
            return Ok(());
        }

        if !self.delegate.should_apply_command(&command) {
            self.with_metrics(NavigatorMetrics::record_rejected);
            self.log(
                LogLevel::Debug,
                "command_rejected",
                command_fields(kind, key.as_deref()),
            );
            self.audit(
                NavigatorAuditStage::CommandRejected,
                command_fields(kind, key.as_deref()),
            );
            return Ok(());
        }

        let outcome = self.apply_command(command);
        self.notify_observers();

        match outcome {
            Ok(()) => {
                self.last_command = Some(kind);
                self.with_metrics(NavigatorMetrics::record_applied);
                let mut fields = command_fields(kind, key.as_deref());
                fields.push(json_kv("visible", json!(self.stacks.visible_key())));
                self.log(LogLevel::Debug, "command_applied", fields.clone());
                self.audit(NavigatorAuditStage::CommandApplied, fields);
                Ok(())
            }
            Err(error) => {
                self.with_metrics(NavigatorMetrics::record_failed);
                let mut fields = command_fields(kind, key.as_deref());
                fields.push(json_kv("error", json!(error.to_string())));
                self.log(LogLevel::Warn, "command_failed", fields.clone());
                self.audit(NavigatorAuditStage::CommandFailed, fields);
                self.delegate.on_command_error(kind, error)
            }
        }
    }

    fn notify_observers(&mut self) {
        let changes = self.stacks.take_changes();
        if self.observers.is_empty() {
            return;
        }
        for change in &changes {
            for observer in self.observers.iter_mut() {
                observer.on_stack_changed(change);
            }
        }
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn is_exiting(&self) -> bool {
        self.state == NavigatorState::Exiting
    }

    pub fn stack(&self, channel: Channel) -> &StackSnapshot {
        self.stacks.get(channel)
    }

    pub fn full_screen_keys(&self) -> StackSnapshot {
        self.stacks.full_screen().clone()
    }

    pub fn dialog_keys(&self) -> StackSnapshot {
        self.stacks.dialogs().clone()
    }

    pub fn popup_keys(&self) -> StackSnapshot {
        self.stacks.popups().clone()
    }

    /// Top dialog, or the top full screen when no dialog is open.
    pub fn visible_key(&self) -> Option<&str> {
        self.stacks.visible_key()
    }

    pub fn visible_screen(&self) -> Option<&S> {
        self.visible_key().and_then(|key| self.registry.screen(key))
    }

    pub fn screen(&self, key: &str) -> Option<&S> {
        self.registry.screen(key)
    }

    pub fn destination(&self, key: &str) -> Option<&Destination<C>> {
        self.registry.destination(key)
    }

    pub fn channel_of(&self, key: &str) -> Option<Channel> {
        self.stacks.channel_of(key)
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.registry.contains(key)
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_back_handler(&self, key: &str) -> bool {
        self.back_handlers.contains(key)
    }

    pub fn last_command(&self) -> Option<CommandKind> {
        self.last_command
    }

    /// Animation hint derived from the last applied command.
    pub fn transition_direction(&self) -> Option<TransitionDirection> {
        self.last_command.map(|kind| kind.direction())
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        let mut back_handlers: Vec<ScreenKey> =
            self.back_handlers.keys().map(str::to_string).collect();
        back_handlers.sort();
        NavigationSnapshot {
            state: self.state,
            full_screen: self.full_screen_keys(),
            dialogs: self.dialog_keys(),
            popups: self.popup_keys(),
            visible: self.visible_key().map(str::to_string),
            last_command: self.last_command,
            back_handlers,
        }
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.registry.len()))
    }

    /// Write the current metrics snapshot through the configured logger.
    pub fn emit_metrics_snapshot(&self) -> Result<()> {
        let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        else {
            return Ok(());
        };
        logger.log_event(snapshot.to_log_event(&self.config.metrics_target))?;
        Ok(())
    }

    /// Check the structural invariants tying the stacks, the registry and the
    /// back-handler registry together.
    pub fn verify_consistency(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for channel in Channel::ALL {
            for key in self.stacks.get(channel).iter() {
                if seen.contains(&key.as_str()) {
                    return Err(NavigationError::InconsistentState(format!(
                        "key `{key}` appears more than once across channels"
                    )));
                }
                seen.push(key.as_str());
                match self.registry.channel_of(key) {
                    Some(registered) if registered == channel => {}
                    Some(registered) => {
                        return Err(NavigationError::InconsistentState(format!(
                            "key `{key}` sits in {channel} but resolved to {registered}"
                        )));
                    }
                    None => {
                        return Err(NavigationError::InconsistentState(format!(
                            "key `{key}` in {channel} has no registry entry"
                        )));
                    }
                }
            }
        }

        if let Some(orphan) = self.registry.keys().find(|key| !seen.contains(key)) {
            return Err(NavigationError::InconsistentState(format!(
                "registry entry `{orphan}` is not in any channel"
            )));
        }

        if let Some(dangling) = self
            .back_handlers
            .keys()
            .find(|key| !self.registry.contains(key))
        {
            return Err(NavigationError::InconsistentState(format!(
                "back handler registered for unknown key `{dangling}`"
            )));
        }

        Ok(())
    }

    fn with_metrics(&self, record: impl FnOnce(&mut NavigatorMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = event_with_fields(level, &self.config.log_target, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }

    fn audit<I>(&self, stage: NavigatorAuditStage, details: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(audit) = self.config.audit.as_ref() {
            let mut builder = NavigatorAuditEventBuilder::new(stage);
            for (key, value) in details {
                builder.detail(key, value);
            }
            audit.record(builder.finish());
        }
    }
}

impl<S: Screen, C> fmt::Debug for Navigator<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("state", &self.state)
            .field("full_screen", self.stacks.full_screen())
            .field("dialogs", self.stacks.dialogs())
            .field("popups", self.stacks.popups())
            .field("back_handlers", &self.back_handlers)
            .field("last_command", &self.last_command)
            .finish()
    }
}

fn command_fields(kind: CommandKind, key: Option<&str>) -> Vec<(String, Value)> {
    let mut fields = vec![json_kv("command", kind.as_str())];
    if let Some(key) = key {
        fields.push(json_kv("key", key));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use crate::logging::MemorySink;
    use crate::navigator::audit::BufferedNavigatorAudit;
    use crate::screen::RouteScreen;

    #[derive(Default)]
    struct ExitCounter {
        exits: Arc<Mutex<u32>>,
    }

    impl NavigationDelegate<RouteScreen, ()> for ExitCounter {
        fn perform_exit(&mut self) {
            *self.exits.lock().unwrap() += 1;
        }
    }

    fn adapter(screen: &RouteScreen) -> std::result::Result<Destination<()>, AdapterError> {
        match screen.route.as_str() {
            "dialog" => Ok(Destination::Dialog(())),
            "broken" => Err(AdapterError::new("no destination")),
            _ => Ok(Destination::FullScreen(())),
        }
    }

    #[test]
    fn config_metrics_toggle() {
        let mut config = NavigatorConfig::default();
        assert!(config.metrics_handle().is_none());
        config.enable_metrics();
        let handle = config.metrics_handle().expect("metrics");
        config.enable_metrics();
        assert!(Arc::ptr_eq(&handle, &config.metrics_handle().unwrap()));
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }

    #[test]
    fn applied_commands_are_logged_and_counted() {
        let sink = MemorySink::new();
        let audit = Arc::new(BufferedNavigatorAudit::new());
        let mut config = NavigatorConfig::default()
            .with_logger(Logger::new(sink.clone()))
            .with_audit(audit.clone());
        config.enable_metrics();

        let mut navigator: Navigator<RouteScreen, ()> =
            Navigator::with_config(adapter, ExitCounter::default(), config);
        navigator
            .apply([
                Command::Forward(RouteScreen::new("home")),
                Command::Forward(RouteScreen::with_key("confirm", "dialog")),
            ])
            .unwrap();

        let snapshot = navigator.metrics_snapshot().unwrap();
        assert_eq!(snapshot.commands_applied, 2);
        assert_eq!(snapshot.screens_registered, 2);
        assert_eq!(snapshot.live_screens, 2);

        let applied: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.message == "command_applied")
            .collect();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[1].field("visible"), Some(&json!("confirm")));

        let stages = audit.stages();
        assert_eq!(stages[0], NavigatorAuditStage::NavigatorConstructed);
        assert!(stages.contains(&NavigatorAuditStage::ScreenRegistered));

        navigator.emit_metrics_snapshot().unwrap();
        assert_eq!(sink.messages().last().map(String::as_str), Some("navigator_metrics"));
    }

    #[test]
    fn failing_command_is_counted_and_reraised() {
        let mut config = NavigatorConfig::default();
        config.enable_metrics();
        let mut navigator: Navigator<RouteScreen, ()> =
            Navigator::with_config(adapter, ExitCounter::default(), config);

        let err = navigator
            .apply([
                Command::Forward(RouteScreen::new("home")),
                Command::Forward(RouteScreen::new("broken")),
                Command::Forward(RouteScreen::new("never")),
            ])
            .unwrap_err();

        assert!(matches!(err, NavigationError::AdapterResolution { ref key, .. } if key == "broken"));
        assert_eq!(navigator.full_screen_keys().keys(), ["home".to_string()]);
        let snapshot = navigator.metrics_snapshot().unwrap();
        assert_eq!(snapshot.commands_failed, 1);
        assert_eq!(snapshot.commands_applied, 1);
        assert_eq!(navigator.last_command(), Some(CommandKind::Forward));
    }

    #[test]
    fn commands_after_exit_are_ignored() {
        let exits = Arc::new(Mutex::new(0));
        let audit = Arc::new(BufferedNavigatorAudit::new());
        let config = NavigatorConfig::default().with_audit(audit.clone());
        let mut navigator: Navigator<RouteScreen, ()> = Navigator::with_config(
            adapter,
            ExitCounter {
                exits: exits.clone(),
            },
            config,
        );

        navigator
            .apply([
                Command::Forward(RouteScreen::new("home")),
                Command::Back,
                Command::Forward(RouteScreen::new("late")),
                Command::Back,
            ])
            .unwrap();

        assert!(navigator.is_exiting());
        assert_eq!(*exits.lock().unwrap(), 1);
        assert!(!navigator.is_registered("late"));
        assert_eq!(
            audit
                .stages()
                .iter()
                .filter(|stage| **stage == NavigatorAuditStage::CommandIgnoredAfterExit)
                .count(),
            2
        );
    }

    #[test]
    fn snapshot_serializes_channels() {
        let mut navigator: Navigator<RouteScreen, ()> =
            Navigator::new(adapter, ExitCounter::default());
        navigator
            .apply([
                Command::Forward(RouteScreen::new("home")),
                Command::Forward(RouteScreen::with_key("confirm", "dialog")),
                Command::back_press_handler(|| false),
            ])
            .unwrap();

        let value = serde_json::to_value(navigator.snapshot()).unwrap();
        assert_eq!(
            value,
            json!({
                "state": "active",
                "full_screen": ["home"],
                "dialogs": ["confirm"],
                "popups": [],
                "visible": "confirm",
                "last_command": "add_back_press_handler",
                "back_handlers": ["confirm"],
            })
        );
        navigator.verify_consistency().unwrap();
    }

    #[test]
    fn transition_direction_tracks_last_command() {
        let mut navigator: Navigator<RouteScreen, ()> =
            Navigator::new(adapter, ExitCounter::default());
        assert_eq!(navigator.transition_direction(), None);

        navigator
            .apply([
                Command::Forward(RouteScreen::new("a")),
                Command::Forward(RouteScreen::new("b")),
            ])
            .unwrap();
        assert_eq!(
            navigator.transition_direction(),
            Some(TransitionDirection::Forward)
        );

        navigator.execute(Command::Back).unwrap();
        assert_eq!(
            navigator.transition_direction(),
            Some(TransitionDirection::Backward)
        );
    }
}
