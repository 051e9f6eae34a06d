pub mod config;
pub mod constants;

pub use config::{ConfigError, SessionConfig, load_session_config};
