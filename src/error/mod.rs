mod types;

pub use types::{AdapterError, HandlerError, NavigationError, Result};
