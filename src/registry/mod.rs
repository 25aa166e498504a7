mod core;

pub use self::core::{RegisteredScreen, ScreenRegistry};
