mod core;

pub use self::core::{BackHandlerRegistry, BackPressHandler, FallibleHandler, HandlerResult};
