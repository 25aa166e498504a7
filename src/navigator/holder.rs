//! Owner-side wiring: a holder the application attaches its navigator to,
//! and a router that issues commands through it.
//!
//! Commands issued while no navigator is attached are buffered and replayed,
//! in order, as soon as one is attached again.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{NavigationError, Result};
use crate::handlers::BackPressHandler;
use crate::screen::Screen;

use super::{Command, Navigator};

/// Anything that can apply a batch of commands.
pub trait CommandSink<S> {
    fn apply_commands(&mut self, commands: Vec<Command<S>>) -> Result<()>;
}

impl<S, C> CommandSink<S> for Navigator<S, C>
where
    S: Screen + 'static,
    C: 'static,
{
    fn apply_commands(&mut self, commands: Vec<Command<S>>) -> Result<()> {
        self.apply(commands)
    }
}

/// Shared handle, so the owner keeps reading the navigator while it is attached.
impl<S, T> CommandSink<S> for Rc<RefCell<T>>
where
    T: CommandSink<S>,
{
    fn apply_commands(&mut self, commands: Vec<Command<S>>) -> Result<()> {
        let mut navigator = self
            .try_borrow_mut()
            .map_err(|_| NavigationError::Reentrant)?;
        navigator.apply_commands(commands)
    }
}

pub struct NavigatorHolder<S> {
    navigator: Option<Box<dyn CommandSink<S>>>,
    pending: VecDeque<Vec<Command<S>>>,
}

impl<S> Default for NavigatorHolder<S> {
    fn default() -> Self {
        Self {
            navigator: None,
            pending: VecDeque::new(),
        }
    }
}

impl<S> NavigatorHolder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `navigator`, replacing any previous one, then replay buffered
    /// batches. On failure the batches not yet replayed stay buffered.
    pub fn attach<N>(&mut self, navigator: N) -> Result<()>
    where
        N: CommandSink<S> + 'static,
    {
        self.navigator = Some(Box::new(navigator));
        self.flush_pending()
    }

    pub fn detach(&mut self) -> Option<Box<dyn CommandSink<S>>> {
        self.navigator.take()
    }

    pub fn is_attached(&self) -> bool {
        self.navigator.is_some()
    }

    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    pub fn execute(&mut self, commands: Vec<Command<S>>) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        match self.navigator.as_mut() {
            Some(navigator) => navigator.apply_commands(commands),
            None => {
                self.pending.push_back(commands);
                Ok(())
            }
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        let Some(navigator) = self.navigator.as_mut() else {
            return Ok(());
        };
        while let Some(batch) = self.pending.pop_front() {
            navigator.apply_commands(batch)?;
        }
        Ok(())
    }
}

/// High-level navigation API issuing command batches through a holder.
pub struct Router<S> {
    holder: NavigatorHolder<S>,
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self {
            holder: NavigatorHolder::new(),
        }
    }
}

impl<S: Screen> Router<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self) -> &NavigatorHolder<S> {
        &self.holder
    }

    pub fn holder_mut(&mut self) -> &mut NavigatorHolder<S> {
        &mut self.holder
    }

    pub fn navigate_to(&mut self, screen: S) -> Result<()> {
        self.execute(vec![Command::Forward(screen)])
    }

    /// Open several screens in one batch, the last ending on top.
    pub fn navigate_chain(&mut self, screens: impl IntoIterator<Item = S>) -> Result<()> {
        self.execute(screens.into_iter().map(Command::Forward).collect())
    }

    pub fn replace_screen(&mut self, screen: S) -> Result<()> {
        self.execute(vec![Command::Replace(screen)])
    }

    /// Drop everything above the root, then replace the root with `screen`.
    pub fn new_root_screen(&mut self, screen: S) -> Result<()> {
        self.execute(vec![Command::BackTo(None), Command::Replace(screen)])
    }

    pub fn back_to(&mut self, screen: S) -> Result<()> {
        self.execute(vec![Command::BackTo(Some(screen))])
    }

    pub fn back_to_root(&mut self) -> Result<()> {
        self.execute(vec![Command::BackTo(None)])
    }

    /// Back gesture; exits the navigator when nothing is left to pop.
    pub fn exit(&mut self) -> Result<()> {
        self.execute(vec![Command::Back])
    }

    pub fn remove_screen(&mut self, screen: S) -> Result<()> {
        self.execute(vec![Command::Remove(screen)])
    }

    pub fn add_back_press_handler<H>(&mut self, handler: H) -> Result<()>
    where
        H: BackPressHandler + 'static,
    {
        self.execute(vec![Command::back_press_handler(handler)])
    }

    pub fn execute(&mut self, commands: Vec<Command<S>>) -> Result<()> {
        self.holder.execute(commands)
    }
}
