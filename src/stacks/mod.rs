mod core;

pub use self::core::{ChannelStacks, StackChange, StackObserver, StackSnapshot};
