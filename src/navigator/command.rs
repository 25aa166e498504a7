use std::fmt;

use serde::Serialize;

use crate::handlers::BackPressHandler;
use crate::screen::Screen;

/// Requested navigation transition.
pub enum Command<S> {
    /// Open `screen`, moving it to the top of its channel if already open.
    Forward(S),
    /// Like `Forward`, but the top of the target channel is evicted first.
    Replace(S),
    /// Back gesture against the visible screen.
    Back,
    /// Pop full screens until `screen` is on top; `None` pops to the root.
    BackTo(Option<S>),
    Remove(S),
    /// Attach a handler to the currently visible screen.
    AddBackPressHandler(Box<dyn BackPressHandler>),
}

impl<S: Screen> Command<S> {
    pub fn back_press_handler<H>(handler: H) -> Self
    where
        H: BackPressHandler + 'static,
    {
        Command::AddBackPressHandler(Box::new(handler))
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Forward(_) => CommandKind::Forward,
            Command::Replace(_) => CommandKind::Replace,
            Command::Back => CommandKind::Back,
            Command::BackTo(_) => CommandKind::BackTo,
            Command::Remove(_) => CommandKind::Remove,
            Command::AddBackPressHandler(_) => CommandKind::AddBackPressHandler,
        }
    }

    /// Screen named by the command, if any.
    pub fn screen(&self) -> Option<&S> {
        match self {
            Command::Forward(screen) | Command::Replace(screen) | Command::Remove(screen) => {
                Some(screen)
            }
            Command::BackTo(screen) => screen.as_ref(),
            Command::Back | Command::AddBackPressHandler(_) => None,
        }
    }

    pub fn screen_key(&self) -> Option<&str> {
        self.screen().map(Screen::key)
    }
}

impl<S: Screen> fmt::Debug for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddBackPressHandler(_) => f
                .debug_tuple("AddBackPressHandler")
                .field(&format_args!("<handler>"))
                .finish(),
            Command::BackTo(screen) => f.debug_tuple("BackTo").field(screen).finish(),
            Command::Back => f.write_str("Back"),
            Command::Forward(screen) => f.debug_tuple("Forward").field(screen).finish(),
            Command::Replace(screen) => f.debug_tuple("Replace").field(screen).finish(),
            Command::Remove(screen) => f.debug_tuple("Remove").field(screen).finish(),
        }
    }
}

/// Payload-free tag of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Forward,
    Replace,
    Back,
    BackTo,
    Remove,
    AddBackPressHandler,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Forward => "forward",
            CommandKind::Replace => "replace",
            CommandKind::Back => "back",
            CommandKind::BackTo => "back_to",
            CommandKind::Remove => "remove",
            CommandKind::AddBackPressHandler => "add_back_press_handler",
        }
    }

    /// Direction a renderer should animate after this command.
    pub fn direction(&self) -> TransitionDirection {
        match self {
            CommandKind::Back | CommandKind::BackTo | CommandKind::Remove => {
                TransitionDirection::Backward
            }
            _ => TransitionDirection::Forward,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDirection {
    Forward,
    Backward,
}
