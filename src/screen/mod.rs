mod core;

pub use self::core::{Channel, Destination, DestinationKind, RouteScreen, Screen, ScreenKey};
