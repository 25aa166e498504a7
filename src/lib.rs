//! Navigation command processor for multi-channel screen stacks.
//!
//! A [`Navigator`] tracks which screens are visible across three independent
//! channels (full screen, dialog, popup) and mutates that state in response
//! to [`Command`]s. Rendering is left to the caller: the navigator exposes
//! copy-on-write [`StackSnapshot`]s per channel and notifies
//! [`StackObserver`]s after every applied command.
//!
//! ```
//! use room_nav::{AdapterError, Command, Destination, NavigationDelegate, Navigator, RouteScreen};
//!
//! struct App;
//!
//! impl NavigationDelegate<RouteScreen, ()> for App {
//!     fn perform_exit(&mut self) {}
//! }
//!
//! fn adapter(screen: &RouteScreen) -> Result<Destination<()>, AdapterError> {
//!     Ok(match screen.route.as_str() {
//!         "confirm" => Destination::Dialog(()),
//!         _ => Destination::FullScreen(()),
//!     })
//! }
//!
//! let mut navigator = Navigator::new(adapter, App);
//! navigator
//!     .apply([
//!         Command::Forward(RouteScreen::new("home")),
//!         Command::Forward(RouteScreen::new("confirm")),
//!     ])
//!     .unwrap();
//! assert_eq!(navigator.visible_key(), Some("confirm"));
//! ```

pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod navigator;
pub mod registry;
pub mod screen;
pub mod stacks;

pub use error::{AdapterError, HandlerError, NavigationError, Result};
pub use handlers::{BackHandlerRegistry, BackPressHandler, FallibleHandler, HandlerResult};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{MetricSnapshot, NavigatorMetrics};
pub use navigator::audit::{
    BufferedNavigatorAudit, NavigatorAudit, NavigatorAuditEvent, NavigatorAuditEventBuilder,
    NavigatorAuditStage, NullNavigatorAudit,
};
pub use navigator::diagnostics::StackLogObserver;
pub use navigator::holder::{CommandSink, NavigatorHolder, Router};
pub use navigator::{
    Command, CommandKind, NavigationDelegate, NavigationSnapshot, Navigator, NavigatorConfig,
    NavigatorState, ScreenAdapter, TransitionDirection,
};
pub use registry::{RegisteredScreen, ScreenRegistry};
pub use screen::{Channel, Destination, DestinationKind, RouteScreen, Screen, ScreenKey};
pub use stacks::{ChannelStacks, StackChange, StackObserver, StackSnapshot};
