//! Named PostgreSQL data sources
//!
//! Connection pools are declared in configuration under a name and looked up
//! by that name at runtime, so components only carry a data source reference
//! rather than connection details.
//!
//! ```no_run
//! use database_layer::{DataSourceConfig, DataSourceRegistry};
//!
//! # async fn run() -> Result<(), database_layer::DatabaseError> {
//! let registry = DataSourceRegistry::from_configs(&[DataSourceConfig::new(
//!     "PERMISSIONS_DB",
//!     "postgres://localhost/permissions",
//! )])
//! .await?;
//!
//! let pool = registry.get("PERMISSIONS_DB")?;
//! assert!(pool.is_healthy().await);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod registry;

pub use connection::*;
pub use error::*;
pub use registry::*;
