pub mod client;
pub mod config;
pub mod error;
pub mod resolver;
pub mod sequence;

pub use client::{FlywheelApi, FlywheelClient};
pub use config::{Config, resolve_config_path};
pub use error::{Error, Result};
pub use resolver::resolve_sessions;
pub use sequence::fetch_sequence_info;
