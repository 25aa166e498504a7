use crate::error::{AdapterError, NavigationError, Result};
use crate::screen::Destination;

use super::command::{Command, CommandKind};

/// Resolves a screen into the destination the presentation layer renders.
///
/// Implementations must be deterministic per key; the navigator caches the
/// first resolution and never asks again while the key stays registered.
pub trait ScreenAdapter<S, C> {
    fn resolve(&self, screen: &S) -> std::result::Result<Destination<C>, AdapterError>;
}

impl<S, C, F> ScreenAdapter<S, C> for F
where
    F: Fn(&S) -> std::result::Result<Destination<C>, AdapterError>,
{
    fn resolve(&self, screen: &S) -> std::result::Result<Destination<C>, AdapterError> {
        self(screen)
    }
}

/// Owner-side collaborator that gates commands and hears about lifecycle
/// transitions. Only [`NavigationDelegate::perform_exit`] is mandatory.
pub trait NavigationDelegate<S, C> {
    /// Admission gate consulted before every command.
    fn should_apply_command(&mut self, _command: &Command<S>) -> bool {
        true
    }

    fn handle_external(&mut self, _screen: &S, _destination: &Destination<C>) {}

    fn on_backing_to_root(&mut self) {}

    fn on_backing_to_screen(&mut self, _screen: &S, _is_initial: bool) {}

    fn on_removing_screen(&mut self, _screen: &S, _is_initial: bool) {}

    /// The navigator reached its terminal state; the owner should tear it down.
    fn perform_exit(&mut self);

    /// Called when a command fails. Returning the error aborts the batch and
    /// hands it to the caller of `apply`; returning `Ok(())` recovers and the
    /// batch continues with the next command.
    fn on_command_error(&mut self, _command: CommandKind, error: NavigationError) -> Result<()> {
        Err(error)
    }
}
