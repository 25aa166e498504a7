use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::screen::{Channel, Destination, Screen, ScreenKey};

/// Screen paired with its cached destination.
#[derive(Debug, Clone)]
pub struct RegisteredScreen<S, C> {
    pub screen: S,
    pub destination: Destination<C>,
}

/// Registry of every screen currently alive in one of the channels.
///
/// Screens and destinations are stored as a single entry so neither can
/// outlive the other. The first registration of a key wins; later
/// registrations under the same key are ignored.
#[derive(Debug)]
pub struct ScreenRegistry<S, C> {
    entries: HashMap<ScreenKey, RegisteredScreen<S, C>>,
}

impl<S, C> Default for ScreenRegistry<S, C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<S: Screen, C> ScreenRegistry<S, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `screen` unless its key is already known. Returns `true` when
    /// a new entry was created.
    pub fn register(&mut self, screen: S, destination: Destination<C>) -> bool {
        match self.entries.entry(screen.key().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(RegisteredScreen {
                    screen,
                    destination,
                });
                true
            }
        }
    }

    /// Drop both the screen and its destination.
    pub fn release(&mut self, key: &str) -> Option<RegisteredScreen<S, C>> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&RegisteredScreen<S, C>> {
        self.entries.get(key)
    }

    pub fn screen(&self, key: &str) -> Option<&S> {
        self.entries.get(key).map(|entry| &entry.screen)
    }

    pub fn destination(&self, key: &str) -> Option<&Destination<C>> {
        self.entries.get(key).map(|entry| &entry.destination)
    }

    /// Channel the key was resolved into when it was first registered.
    pub fn channel_of(&self, key: &str) -> Option<Channel> {
        self.destination(key).and_then(Destination::channel)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::RouteScreen;

    #[test]
    fn first_registration_wins() {
        let mut registry = ScreenRegistry::new();
        assert!(registry.register(RouteScreen::new("a"), Destination::FullScreen("first")));
        assert!(!registry.register(
            RouteScreen::new("a").arg("ignored", true),
            Destination::Dialog("second")
        ));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.channel_of("a"), Some(Channel::FullScreen));
        assert_eq!(*registry.destination("a").unwrap().content(), "first");
        assert!(registry.screen("a").unwrap().args.is_empty());
    }

    #[test]
    fn release_clears_screen_and_destination() {
        let mut registry = ScreenRegistry::new();
        registry.register(RouteScreen::new("d"), Destination::Dialog(()));

        let released = registry.release("d").expect("entry");
        assert_eq!(released.screen.key, "d");
        assert!(!registry.contains("d"));
        assert!(registry.destination("d").is_none());
        assert!(registry.release("d").is_none());
    }
}
