use serde_json::json;

use crate::error::{NavigationError, Result};
use crate::handlers::BackPressHandler;
use crate::logging::{LogLevel, json_kv};
use crate::metrics::NavigatorMetrics;
use crate::screen::{Channel, Destination, Screen};

use super::{Command, Navigator, NavigatorAuditStage, NavigatorState};

impl<S, C> Navigator<S, C>
where
    S: Screen + 'static,
    C: 'static,
{
    pub(super) fn apply_command(&mut self, command: Command<S>) -> Result<()> {
        match command {
            Command::Forward(screen) => self.forward(screen, false),
            Command::Replace(screen) => self.forward(screen, true),
            Command::Back => self.back(),
            Command::BackTo(screen) => {
                self.back_to(screen.as_ref());
                Ok(())
            }
            Command::Remove(screen) => {
                self.remove(screen.key());
                Ok(())
            }
            Command::AddBackPressHandler(handler) => {
                self.add_back_handler(handler);
                Ok(())
            }
        }
    }

    /// Forward and Replace share one path; `replace_top` evicts the top of
    /// the target channel before the key is pushed.
    fn forward(&mut self, screen: S, replace_top: bool) -> Result<()> {
        let key = screen.key().to_string();
        let channel = match self.registry.channel_of(&key) {
            Some(channel) => channel,
            None => {
                let destination = self.adapter.resolve(&screen).map_err(|err| {
                    NavigationError::AdapterResolution {
                        key: key.clone(),
                        reason: err.to_string(),
                    }
                })?;
                match destination.channel() {
                    Some(channel) => {
                        self.register(screen, destination);
                        channel
                    }
                    None => {
                        self.forward_external(&screen, &destination, replace_top);
                        return Ok(());
                    }
                }
            }
        };

        if channel == Channel::FullScreen {
            self.close_all_dialogs();
        }

        if let Some(evicted) = self.stacks.bring_to_top(channel, &key, replace_top) {
            self.release(&evicted);
        }
        Ok(())
    }

    fn forward_external(&mut self, screen: &S, destination: &Destination<C>, replace_top: bool) {
        self.delegate.handle_external(screen, destination);
        if replace_top {
            self.exit_navigator();
        }
    }

    fn close_all_dialogs(&mut self) {
        for key in self.stacks.clear(Channel::Dialog) {
            self.release(&key);
        }
    }

    fn remove(&mut self, key: &str) {
        match self.registry.channel_of(key) {
            Some(Channel::FullScreen) => self.remove_full_screen(key),
            Some(channel) => self.remove_from(channel, key),
            None => {}
        }
    }

    /// A lone root cannot be removed; removing it exits the navigator instead.
    fn remove_full_screen(&mut self, key: &str) {
        let stack = self.stacks.full_screen();
        let is_last = stack.is_empty() || (stack.len() == 1 && stack.top() == Some(key));
        if is_last {
            self.exit_navigator();
            return;
        }
        self.remove_from(Channel::FullScreen, key);
    }

    fn remove_from(&mut self, channel: Channel, key: &str) {
        self.notify_removing(key);
        self.stacks.remove(channel, key);
        self.release(key);
    }

    fn back(&mut self) -> Result<()> {
        let Some(key) = self.stacks.visible_key().map(str::to_string) else {
            self.exit_navigator();
            return Ok(());
        };

        let can_exit =
            self.back_handlers
                .can_exit(&key)
                .map_err(|err| NavigationError::BackHandler {
                    key: key.clone(),
                    reason: err.to_string(),
                })?;
        if !can_exit {
            self.log(LogLevel::Debug, "back_consumed", [json_kv("key", key.as_str())]);
            return Ok(());
        }

        self.back_handlers.remove(&key);
        match self.registry.channel_of(&key) {
            Some(Channel::FullScreen) => self.remove_full_screen(&key),
            Some(Channel::Dialog) => self.remove_from(Channel::Dialog, &key),
            Some(Channel::Popup) | None => {}
        }
        Ok(())
    }

    /// Pops full screens until `target` is on top. Targets that are not in
    /// the full-screen channel fall back to popping to the root.
    fn back_to(&mut self, target: Option<&S>) {
        let key = target
            .map(Screen::key)
            .filter(|key| self.stacks.full_screen().contains_key(key));
        let Some(key) = key.map(str::to_string) else {
            self.back_to_root();
            return;
        };

        let is_initial = self.stacks.full_screen().root() == Some(key.as_str());
        if let Some(screen) = self.registry.screen(&key) {
            self.delegate.on_backing_to_screen(screen, is_initial);
        }
        for evicted in self.stacks.pop_until(Channel::FullScreen, &key) {
            self.release(&evicted);
        }
    }

    fn back_to_root(&mut self) {
        if self.stacks.full_screen().len() <= 1 {
            return;
        }
        self.delegate.on_backing_to_root();
        for evicted in self.stacks.pop_to_root(Channel::FullScreen) {
            self.release(&evicted);
        }
    }

    fn add_back_handler(&mut self, handler: Box<dyn BackPressHandler>) {
        match self.stacks.visible_key().map(str::to_string) {
            Some(key) => self.back_handlers.insert(key, handler),
            None => self.log(
                LogLevel::Debug,
                "back_handler_dropped",
                [json_kv("reason", "no visible screen")],
            ),
        }
    }

    fn register(&mut self, screen: S, destination: Destination<C>) {
        let key = screen.key().to_string();
        let channel = destination.channel();
        if self.registry.register(screen, destination) {
            self.with_metrics(NavigatorMetrics::record_registered);
            self.audit(
                NavigatorAuditStage::ScreenRegistered,
                [
                    json_kv("key", key.as_str()),
                    json_kv("channel", json!(channel)),
                ],
            );
        }
    }

    /// Clear every registry entry for a key that left its channel.
    fn release(&mut self, key: &str) {
        if self.registry.release(key).is_none() {
            return;
        }
        self.back_handlers.remove(key);
        self.with_metrics(|metrics| metrics.record_released(1));
        self.log(LogLevel::Debug, "screen_released", [json_kv("key", key)]);
        self.audit(NavigatorAuditStage::ScreenReleased, [json_kv("key", key)]);
    }

    fn notify_removing(&mut self, key: &str) {
        let is_initial = self.stacks.full_screen().root() == Some(key);
        if let Some(screen) = self.registry.screen(key) {
            self.delegate.on_removing_screen(screen, is_initial);
        }
    }

    fn exit_navigator(&mut self) {
        self.state = NavigatorState::Exiting;
        self.with_metrics(NavigatorMetrics::record_exit);
        self.log(
            LogLevel::Info,
            "exit_requested",
            [json_kv("full_screen", self.stacks.full_screen().len())],
        );
        self.audit(NavigatorAuditStage::ExitRequested, std::iter::empty());
        self.delegate.perform_exit();
    }
}
