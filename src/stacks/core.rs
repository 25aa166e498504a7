use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::screen::{Channel, ScreenKey};

/// Immutable view of one channel's keys, bottom first and top last.
///
/// Every mutation of a channel produces a fresh snapshot, so a snapshot
/// handed out earlier never changes underneath its holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSnapshot(Arc<Vec<ScreenKey>>);

impl StackSnapshot {
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ScreenKey>,
    {
        Self(Arc::new(keys.into_iter().map(Into::into).collect()))
    }

    pub fn keys(&self) -> &[ScreenKey] {
        self.0.as_slice()
    }

    pub fn top(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn root(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|entry| entry == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|entry| entry == key)
    }

    /// True when both snapshots are the same allocation.
    pub fn same_as(&self, other: &StackSnapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for StackSnapshot {
    type Target = [ScreenKey];

    fn deref(&self) -> &Self::Target {
        self.keys()
    }
}

impl Serialize for StackSnapshot {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.0.serialize(serializer)
    }
}

/// Net change of one channel across a single command.
#[derive(Debug, Clone)]
pub struct StackChange {
    pub channel: Channel,
    pub previous: StackSnapshot,
    pub current: StackSnapshot,
}

impl StackChange {
    /// Keys that left the channel; renderers release per-screen state for these.
    pub fn removed_keys(&self) -> Vec<&str> {
        self.previous
            .iter()
            .filter(|key| !self.current.contains_key(key))
            .map(String::as_str)
            .collect()
    }

    pub fn added_keys(&self) -> Vec<&str> {
        self.current
            .iter()
            .filter(|key| !self.previous.contains_key(key))
            .map(String::as_str)
            .collect()
    }

    pub fn top_changed(&self) -> bool {
        self.previous.top() != self.current.top()
    }
}

/// Receives channel changes after every applied command.
pub trait StackObserver {
    fn on_stack_changed(&mut self, change: &StackChange);
}

impl<F> StackObserver for F
where
    F: FnMut(&StackChange),
{
    fn on_stack_changed(&mut self, change: &StackChange) {
        self(change)
    }
}

/// The three channel stacks plus bookkeeping for pending change notifications.
#[derive(Debug, Default)]
pub struct ChannelStacks {
    stacks: [StackSnapshot; 3],
    baseline: [Option<StackSnapshot>; 3],
}

impl ChannelStacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> &StackSnapshot {
        &self.stacks[channel.index()]
    }

    pub fn full_screen(&self) -> &StackSnapshot {
        self.get(Channel::FullScreen)
    }

    pub fn dialogs(&self) -> &StackSnapshot {
        self.get(Channel::Dialog)
    }

    pub fn popups(&self) -> &StackSnapshot {
        self.get(Channel::Popup)
    }

    /// Top dialog, falling back to the top full screen. Popups never count.
    pub fn visible_key(&self) -> Option<&str> {
        self.dialogs().top().or_else(|| self.full_screen().top())
    }

    pub fn channel_of(&self, key: &str) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|channel| self.get(*channel).contains_key(key))
    }

    /// Copy-on-write update of one channel. The snapshot is only replaced
    /// when the closure actually changed the key order.
    pub fn update<R>(&mut self, channel: Channel, apply: impl FnOnce(&mut Vec<ScreenKey>) -> R) -> R {
        let idx = channel.index();
        let mut keys = self.stacks[idx].keys().to_vec();
        let result = apply(&mut keys);
        if keys.as_slice() != self.stacks[idx].keys() {
            let previous = std::mem::replace(&mut self.stacks[idx], StackSnapshot(Arc::new(keys)));
            self.baseline[idx].get_or_insert(previous);
        }
        result
    }

    /// Move `key` to the top of `channel`, pushing it if absent. With
    /// `replace_top`, the current top is evicted first and returned.
    /// Nothing happens when `key` already sits on top.
    pub fn bring_to_top(&mut self, channel: Channel, key: &str, replace_top: bool) -> Option<ScreenKey> {
        if self.get(channel).top() == Some(key) {
            return None;
        }
        self.update(channel, |keys| {
            let evicted = if replace_top { keys.pop() } else { None };
            keys.retain(|entry| entry != key);
            keys.push(key.to_string());
            evicted
        })
    }

    pub fn remove(&mut self, channel: Channel, key: &str) -> bool {
        self.update(channel, |keys| match keys.iter().position(|entry| entry == key) {
            Some(idx) => {
                keys.remove(idx);
                true
            }
            None => false,
        })
    }

    /// Pop entries off the top until `key` is on top. `key` itself is kept;
    /// the channel is left untouched if `key` is not in it.
    pub fn pop_until(&mut self, channel: Channel, key: &str) -> Vec<ScreenKey> {
        let Some(idx) = self.get(channel).position(key) else {
            return Vec::new();
        };
        self.update(channel, |keys| {
            let mut evicted = keys.split_off(idx + 1);
            evicted.reverse();
            evicted
        })
    }

    /// Pop everything above the bottom-most entry, top first.
    pub fn pop_to_root(&mut self, channel: Channel) -> Vec<ScreenKey> {
        self.update(channel, |keys| {
            if keys.len() <= 1 {
                return Vec::new();
            }
            let mut evicted = keys.split_off(1);
            evicted.reverse();
            evicted
        })
    }

    pub fn clear(&mut self, channel: Channel) -> Vec<ScreenKey> {
        self.update(channel, std::mem::take)
    }

    /// Drain the net changes recorded since the last call, one per channel
    /// whose keys differ from where they started.
    pub fn take_changes(&mut self) -> Vec<StackChange> {
        let mut changes = Vec::new();
        for channel in Channel::ALL {
            let idx = channel.index();
            if let Some(previous) = self.baseline[idx].take() {
                let current = self.stacks[idx].clone();
                if previous != current {
                    changes.push(StackChange {
                        channel,
                        previous,
                        current,
                    });
                }
            }
        }
        changes
    }
}
