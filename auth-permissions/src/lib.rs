//! Role-based permission authority
//!
//! Answers "does this user hold this permission" by resolving the user's
//! current roles through an identity provider and checking them against a
//! persisted permission/role grant relation. Also owns the lifecycle of that
//! relation:
//! - Creating and deleting permissions (delete cascades its grants)
//! - Granting a permission to a role
//! - Revoking a permission from one role or from every role
//!
//! # Core Concepts
//!
//! - **Permission**: an opaque resource identifier plus an action
//! - **Role**: a group reported by the identity provider
//! - **Grant**: "members of this role hold this permission"
//! - **Store**: durable home of permissions and grants, opened lazily from a
//!   data source the first time it is needed
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{Group, InMemoryIdentityProvider};
//! use auth_permissions::{
//!     InMemoryDataSource, Permission, PermissionAuthority, PermissionConfig, Role,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let idp = InMemoryIdentityProvider::new();
//!     idp.add_user("alice", vec![Group::new("role-analyst", "Analysts")]);
//!
//!     let authority = PermissionAuthority::builder()
//!         .data_source(Arc::new(InMemoryDataSource::new()))
//!         .config(PermissionConfig::default())
//!         .identity_provider(Arc::new(idp))
//!         .build();
//!
//!     let view = Permission::new("dashboard-1", "view");
//!     authority.add_permission(&view).await?;
//!     authority
//!         .grant_permission(&view, &Role::new("role-analyst", "Analysts"))
//!         .await?;
//!
//!     assert!(authority.has_permission("alice", &view).await?);
//!     Ok(())
//! }
//! ```

pub mod authority;
pub mod config;
pub mod datasource;
pub mod error;
pub mod models;
pub mod resolver;
pub mod store;

pub use authority::*;
pub use config::*;
pub use datasource::*;
pub use error::*;
pub use models::*;
pub use resolver::*;
pub use store::{InMemoryPermissionStore, PermissionStore};
pub use store::postgres::PostgresPermissionStore;
