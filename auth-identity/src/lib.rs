//! Identity provider client for the permission authority
//!
//! The identity provider is the source of truth for which groups a user
//! belongs to. This crate provides:
//! - The [`IdentityProvider`] contract (`users_groups`)
//! - An in-memory provider for development and tests
//! - A REST provider talking to an external identity service
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{Group, IdentityProvider, InMemoryIdentityProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = InMemoryIdentityProvider::new();
//!     provider.add_user("alice", vec![Group::new("role-analyst", "Analysts")]);
//!
//!     let groups = provider.users_groups("alice").await?;
//!     assert_eq!(groups[0].id, "role-analyst");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod rest;

pub use config::*;
pub use error::*;
pub use models::*;
pub use provider::*;
pub use rest::RestIdentityProvider;
