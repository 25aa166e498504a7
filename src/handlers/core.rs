use std::collections::HashMap;
use std::fmt;

use crate::error::HandlerError;
use crate::screen::ScreenKey;

pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Capability that can veto a back gesture for the screen it is attached to.
pub trait BackPressHandler {
    /// `Ok(false)` consumes the back gesture and keeps the screen open.
    fn can_exit_screen(&mut self) -> HandlerResult<bool>;
}

impl<F> BackPressHandler for F
where
    F: FnMut() -> bool,
{
    fn can_exit_screen(&mut self) -> HandlerResult<bool> {
        Ok(self())
    }
}

/// Wraps a fallible closure as a [`BackPressHandler`].
pub struct FallibleHandler<F>(pub F);

impl<F> BackPressHandler for FallibleHandler<F>
where
    F: FnMut() -> HandlerResult<bool>,
{
    fn can_exit_screen(&mut self) -> HandlerResult<bool> {
        (self.0)()
    }
}

/// Key-indexed registry with a single handler slot per screen.
#[derive(Default)]
pub struct BackHandlerRegistry {
    handlers: HashMap<ScreenKey, Box<dyn BackPressHandler>>,
}

impl BackHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` to `key`, replacing whatever occupied the slot.
    pub fn insert(&mut self, key: impl Into<ScreenKey>, handler: Box<dyn BackPressHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.handlers.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Ask the handler registered for `key`. Keys without a handler may exit.
    pub fn can_exit(&mut self, key: &str) -> HandlerResult<bool> {
        match self.handlers.get_mut(key) {
            Some(handler) => handler.can_exit_screen(),
            None => Ok(true),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for BackHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handler_allows_exit() {
        let mut registry = BackHandlerRegistry::new();
        assert!(registry.can_exit("home").unwrap());
    }

    #[test]
    fn single_slot_per_key() {
        let mut registry = BackHandlerRegistry::new();
        registry.insert("form", Box::new(|| false));
        registry.insert("form", Box::new(|| true));

        assert_eq!(registry.len(), 1);
        assert!(registry.can_exit("form").unwrap());
    }

    #[test]
    fn stateful_handler_is_queried_each_time() {
        let mut registry = BackHandlerRegistry::new();
        let mut asked = 0;
        registry.insert(
            "editor",
            Box::new(move || {
                asked += 1;
                asked > 1
            }),
        );

        assert!(!registry.can_exit("editor").unwrap());
        assert!(registry.can_exit("editor").unwrap());
        assert!(registry.remove("editor"));
        assert!(!registry.contains("editor"));
    }

    #[test]
    fn fallible_handler_surfaces_error() {
        let mut registry = BackHandlerRegistry::new();
        registry.insert(
            "upload",
            Box::new(FallibleHandler(|| Err(HandlerError::new("still uploading")))),
        );

        let err = registry.can_exit("upload").unwrap_err();
        assert_eq!(err.to_string(), "still uploading");
    }
}
