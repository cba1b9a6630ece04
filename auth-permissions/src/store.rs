use crate::{
    error::StoreError,
    models::{Permission, Role},
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub mod postgres;

/// Durable relation between permissions and the roles they are granted to
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Create a permission with no grants
    async fn insert(&self, permission: &Permission) -> Result<(), StoreError>;

    /// Remove a permission; it must no longer be granted to any role
    async fn delete(&self, permission: &Permission) -> Result<(), StoreError>;

    /// Grant an existing permission to a role. Re-granting is a no-op.
    async fn grant(&self, permission: &Permission, role: &Role) -> Result<(), StoreError>;

    /// Revoke a permission from every role holding it
    async fn revoke_all(&self, permission: &Permission) -> Result<(), StoreError>;

    /// Revoke a permission from a single role
    async fn revoke(&self, permission: &Permission, role: &Role) -> Result<(), StoreError>;

    /// Whether at least one of the roles holds the permission
    async fn has_any(&self, roles: &[Role], permission: &Permission) -> Result<bool, StoreError>;

    /// Ids of the roles currently holding the permission, sorted
    async fn granted_roles(&self, permission: &Permission) -> Result<Vec<String>, StoreError>;
}

/// In-memory permission store for testing and development
#[derive(Clone, Default)]
pub struct InMemoryPermissionStore {
    grants: Arc<DashMap<Permission, BTreeSet<String>>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn insert(&self, permission: &Permission) -> Result<(), StoreError> {
        match self.grants.entry(permission.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StoreError::PermissionExists(permission.clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(BTreeSet::new());
                Ok(())
            }
        }
    }

    async fn delete(&self, permission: &Permission) -> Result<(), StoreError> {
        if self.grants.remove_if(permission, |_, roles| roles.is_empty()).is_some() {
            return Ok(());
        }

        match self.grants.get(permission) {
            Some(roles) => Err(StoreError::StillGranted {
                permission: permission.clone(),
                roles: roles.len(),
            }),
            None => Err(StoreError::PermissionNotFound(permission.clone())),
        }
    }

    async fn grant(&self, permission: &Permission, role: &Role) -> Result<(), StoreError> {
        let mut roles = self
            .grants
            .get_mut(permission)
            .ok_or_else(|| StoreError::PermissionNotFound(permission.clone()))?;
        roles.insert(role.id.clone());
        Ok(())
    }

    async fn revoke_all(&self, permission: &Permission) -> Result<(), StoreError> {
        if let Some(mut roles) = self.grants.get_mut(permission) {
            debug!("Revoking {} from {} roles", permission, roles.len());
            roles.clear();
        }
        Ok(())
    }

    async fn revoke(&self, permission: &Permission, role: &Role) -> Result<(), StoreError> {
        if let Some(mut roles) = self.grants.get_mut(permission) {
            roles.remove(&role.id);
        }
        Ok(())
    }

    async fn has_any(&self, roles: &[Role], permission: &Permission) -> Result<bool, StoreError> {
        Ok(self
            .grants
            .get(permission)
            .map(|granted| roles.iter().any(|role| granted.contains(&role.id)))
            .unwrap_or(false))
    }

    async fn granted_roles(&self, permission: &Permission) -> Result<Vec<String>, StoreError> {
        self.grants
            .get(permission)
            .map(|roles| roles.iter().cloned().collect())
            .ok_or_else(|| StoreError::PermissionNotFound(permission.clone()))
    }
}
