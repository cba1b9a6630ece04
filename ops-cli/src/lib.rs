//! Operations CLI for the permission authority
//!
//! `permctl` manages permissions and role grants in the configured store and
//! answers authorization checks against the configured identity provider:
//! - `add` / `delete` permissions (delete revokes every grant first)
//! - `grant` / `revoke` a permission for one role or all roles
//! - `check` whether a user holds a permission
//! - `roles` lists the roles holding a permission
//!
//! Configuration comes from `--config` (or `permctl.yaml` in the working
//! directory) overlaid with `PERMCTL_` environment variables.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Cli, Command, PermissionArgs};
pub use commands::{execute, Outcome};
pub use config::CliConfig;
