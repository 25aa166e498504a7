use thiserror::Error;

use crate::logging::LoggingError;
use crate::navigator::CommandKind;
use crate::screen::ScreenKey;

/// Unified result type for the navigation core.
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Errors surfaced while applying navigation commands.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("adapter could not resolve screen `{key}`: {reason}")]
    AdapterResolution { key: ScreenKey, reason: String },
    #[error("back handler for screen `{key}` failed: {reason}")]
    BackHandler { key: ScreenKey, reason: String },
    #[error("failed to apply {command} command: {reason}")]
    CommandApplication { command: CommandKind, reason: String },
    #[error("navigator is already applying commands")]
    Reentrant,
    #[error("navigation state is inconsistent: {0}")]
    InconsistentState(String),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
}

impl NavigationError {
    pub fn command(command: CommandKind, reason: impl Into<String>) -> Self {
        Self::CommandApplication {
            command,
            reason: reason.into(),
        }
    }

    /// Key of the screen involved in the failure, when there is one.
    pub fn screen_key(&self) -> Option<&str> {
        match self {
            Self::AdapterResolution { key, .. } | Self::BackHandler { key, .. } => {
                Some(key.as_str())
            }
            _ => None,
        }
    }
}

/// Failure reported by a [`crate::ScreenAdapter`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct AdapterError(pub String);

impl AdapterError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Failure reported by a [`crate::BackPressHandler`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
