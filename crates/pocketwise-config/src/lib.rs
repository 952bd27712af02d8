//! pocketwise-config
//!
//! Persistent user preferences: display locale, currency, date layout,
//! data directory and colour output. Owns the Config model plus the JSON
//! persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{home_override, Config, HOME_ENV};
