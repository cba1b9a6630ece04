//! Layered configuration loading for the permission authority
//!
//! Sources are merged in the order they are added, later sources overriding
//! earlier ones:
//! - **Files**: YAML (`.yaml`, `.yml`) or TOML (`.toml`)
//! - **Environment Variables**: prefixed, `__` separates nested keys
//! - **Inline YAML**: mostly useful for tests and embedded defaults
//!
//! Consumers read a typed object out of a namespace (a top-level key).
//!
//! # Example
//!
//! ```no_run
//! use config_engine::{ConfigEngine, ConfigSource};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! struct PermissionSettings {
//!     datasource: String,
//! }
//!
//! fn main() -> Result<(), config_engine::ConfigError> {
//!     let engine = ConfigEngine::builder()
//!         .add_source(ConfigSource::file("permctl.yaml"))
//!         .add_source(ConfigSource::env("PERMCTL_"))
//!         .build()?;
//!
//!     let settings: PermissionSettings = engine.get_or_default("permissions")?;
//!     println!("datasource = {}", settings.datasource);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;

pub use engine::*;
pub use error::*;
