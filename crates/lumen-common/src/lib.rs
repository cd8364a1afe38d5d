//! Shared types for the Lumen theme manager.
//!
//! Holds the storage key layout every component agrees on, the active
//! theme value, the error taxonomy and the lifecycle event bus.

pub mod errors;
pub mod events;
pub mod keys;
pub mod types;

pub use errors::{ConfigError, FetchError, LumenError, StoreError};
pub use events::{Event, EventBus};
pub use types::{ActiveTheme, DEFAULT_THEME};
