use crate::{
    config::PermissionConfig,
    datasource::DataSource,
    error::{AuthorityError, Result},
    models::{Permission, Role},
    resolver::RoleResolver,
    store::PermissionStore,
};
use auth_identity::IdentityProvider;
use config_engine::ConfigEngine;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Entry point for permission lifecycle and authorization decisions
pub struct PermissionAuthority {
    /// Where the permission store is opened from
    data_source: Option<Arc<dyn DataSource>>,

    /// Settings passed to the data source on first use
    config: Option<PermissionConfig>,

    /// Resolves usernames to roles; may be rebound at runtime
    resolver: RwLock<Option<RoleResolver>>,

    /// Store handle, opened once on first use
    store: OnceCell<Arc<dyn PermissionStore>>,
}

/// Builder for [`PermissionAuthority`]
#[derive(Default)]
pub struct PermissionAuthorityBuilder {
    data_source: Option<Arc<dyn DataSource>>,
    config: Option<PermissionConfig>,
    resolver: Option<RoleResolver>,
}

impl PermissionAuthorityBuilder {
    pub fn data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    pub fn config(mut self, config: PermissionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the `permissions` namespace, using defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorityError::Configuration`] if the namespace is present
    /// but malformed or invalid.
    pub fn config_from(mut self, engine: &ConfigEngine) -> Result<Self> {
        self.config = Some(PermissionConfig::load(engine)?);
        Ok(self)
    }

    pub fn identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.resolver = Some(RoleResolver::new(provider));
        self
    }

    /// Missing pieces are not an error here; operations needing them fail
    /// with [`AuthorityError::Configuration`] when called.
    pub fn build(self) -> PermissionAuthority {
        PermissionAuthority {
            data_source: self.data_source,
            config: self.config,
            resolver: RwLock::new(self.resolver),
            store: OnceCell::new(),
        }
    }
}

impl PermissionAuthority {
    pub fn builder() -> PermissionAuthorityBuilder {
        PermissionAuthorityBuilder::default()
    }

    /// Replace the identity provider used by [`Self::has_permission`]
    pub fn bind_identity_provider(&self, provider: Arc<dyn IdentityProvider>) {
        info!("Identity provider bound to permission authority");
        *self.resolver.write() = Some(RoleResolver::new(provider));
    }

    pub fn unbind_identity_provider(&self) {
        info!("Identity provider unbound from permission authority");
        *self.resolver.write() = None;
    }

    // =============================================================================
    // Permission Lifecycle
    // =============================================================================

    /// Create a permission with no grants
    pub async fn add_permission(&self, permission: &Permission) -> Result<()> {
        debug!("Adding permission {}", permission);
        self.store().await?.insert(permission).await?;
        Ok(())
    }

    /// Revoke the permission from every role, then delete it.
    ///
    /// The delete is not attempted when the revoke fails. Deleting a
    /// permission that does not exist is an error.
    pub async fn delete_permission(&self, permission: &Permission) -> Result<()> {
        debug!("Deleting permission {}", permission);
        let store = self.store().await?;

        store.revoke_all(permission).await.map_err(|e| {
            warn!("Failed revoking {} before delete: {}", permission, e);
            e
        })?;
        store.delete(permission).await?;

        info!("Deleted permission {}", permission);
        Ok(())
    }

    /// Grant an existing permission to a role
    pub async fn grant_permission(&self, permission: &Permission, role: &Role) -> Result<()> {
        debug!("Granting {} to {}", permission, role);
        self.store().await?.grant(permission, role).await?;
        Ok(())
    }

    /// Revoke a permission from every role; the permission itself stays
    pub async fn revoke_permission(&self, permission: &Permission) -> Result<()> {
        debug!("Revoking {} from all roles", permission);
        self.store().await?.revoke_all(permission).await?;
        Ok(())
    }

    pub async fn revoke_permission_from_role(
        &self,
        permission: &Permission,
        role: &Role,
    ) -> Result<()> {
        debug!("Revoking {} from {}", permission, role);
        self.store().await?.revoke(permission, role).await?;
        Ok(())
    }

    /// Role ids currently holding the permission, sorted
    pub async fn granted_roles(&self, permission: &Permission) -> Result<Vec<String>> {
        Ok(self.store().await?.granted_roles(permission).await?)
    }

    // =============================================================================
    // Authorization
    // =============================================================================

    /// Whether any of the user's current roles holds the permission.
    ///
    /// A user with no roles is denied without opening the store.
    pub async fn has_permission(&self, username: &str, permission: &Permission) -> Result<bool> {
        let resolver = self.resolver.read().clone().ok_or_else(|| {
            AuthorityError::Configuration("no identity provider is bound".to_string())
        })?;

        let roles = resolver.resolve_roles(username).await.map_err(|source| {
            warn!("Failed getting roles of user {}: {}", username, source);
            AuthorityError::RoleResolution {
                username: username.to_string(),
                source,
            }
        })?;

        if roles.is_empty() {
            debug!("User {} has no roles, denying {}", username, permission);
            return Ok(false);
        }

        let allowed = self.store().await?.has_any(&roles, permission).await?;
        debug!("Permission check {} for {}: {}", permission, username, allowed);
        Ok(allowed)
    }

    async fn store(&self) -> Result<&Arc<dyn PermissionStore>> {
        self.store
            .get_or_try_init(|| async {
                let data_source = self.data_source.as_ref().ok_or_else(|| {
                    AuthorityError::Configuration("no data source is bound".to_string())
                })?;
                let config = self.config.as_ref().ok_or_else(|| {
                    AuthorityError::Configuration("no permission configuration is set".to_string())
                })?;

                let store = data_source.open(config).await.map_err(|e| {
                    warn!("Failed opening permission store on {}: {}", config.datasource, e);
                    e
                })?;

                info!("Permission store initialized on {}", config.datasource);
                Ok::<_, AuthorityError>(store)
            })
            .await
    }
}
