use crate::models::Permission;
use auth_identity::IdentityError;
use config_engine::ConfigError;
use database_layer::DatabaseError;
use thiserror::Error;

/// Failures of the permission store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Permission not found: {0}")]
    PermissionNotFound(Permission),

    #[error("Permission already exists: {0}")]
    PermissionExists(Permission),

    #[error("Permission {permission} is still granted to {roles} role(s)")]
    StillGranted { permission: Permission, roles: usize },

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::StorageError(err.to_string())
    }
}

/// Errors surfaced by [`crate::PermissionAuthority`]
#[derive(Error, Debug)]
pub enum AuthorityError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed getting roles of user {username}: {source}")]
    RoleResolution {
        username: String,
        #[source]
        source: IdentityError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ConfigError> for AuthorityError {
    fn from(err: ConfigError) -> Self {
        AuthorityError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuthorityError>;
