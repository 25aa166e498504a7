use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Globally unique identity of a screen.
pub type ScreenKey = String;

/// Caller-defined navigational unit.
///
/// Identity is the key: two screens reporting the same key are the same
/// navigational entity, whatever their payload.
pub trait Screen: Clone + fmt::Debug {
    fn key(&self) -> &str;
}

/// General purpose screen carrying a route name and JSON arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteScreen {
    pub key: ScreenKey,
    pub route: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
}

impl RouteScreen {
    /// Screen whose key doubles as its route.
    pub fn new(route: impl Into<String>) -> Self {
        let route = route.into();
        Self {
            key: route.clone(),
            route,
            args: Map::new(),
        }
    }

    pub fn with_key(key: impl Into<ScreenKey>, route: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            route: route.into(),
            args: Map::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

impl Screen for RouteScreen {
    fn key(&self) -> &str {
        &self.key
    }
}

/// One of the three visibility stacks owned by a navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    FullScreen,
    Dialog,
    Popup,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::FullScreen, Channel::Dialog, Channel::Popup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::FullScreen => "full_screen",
            Channel::Dialog => "dialog",
            Channel::Popup => "popup",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Channel::FullScreen => 0,
            Channel::Dialog => 1,
            Channel::Popup => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag of a [`Destination`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    FullScreen,
    Dialog,
    Popup,
    External,
}

/// Channel-tagged resolution of a screen, produced by a [`crate::ScreenAdapter`].
///
/// `C` is whatever the presentation layer needs to materialize the screen; the
/// core never looks inside it. `External` hands the screen off to a different
/// navigation subsystem and never occupies a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination<C> {
    FullScreen(C),
    Dialog(C),
    Popup(C),
    External(C),
}

impl<C> Destination<C> {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::FullScreen(_) => DestinationKind::FullScreen,
            Destination::Dialog(_) => DestinationKind::Dialog,
            Destination::Popup(_) => DestinationKind::Popup,
            Destination::External(_) => DestinationKind::External,
        }
    }

    /// Channel the destination lives in; `None` for external hand-offs.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Destination::FullScreen(_) => Some(Channel::FullScreen),
            Destination::Dialog(_) => Some(Channel::Dialog),
            Destination::Popup(_) => Some(Channel::Popup),
            Destination::External(_) => None,
        }
    }

    pub fn content(&self) -> &C {
        match self {
            Destination::FullScreen(content)
            | Destination::Dialog(content)
            | Destination::Popup(content)
            | Destination::External(content) => content,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Destination::External(_))
    }
}
