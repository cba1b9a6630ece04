use crate::models::Role;
use auth_identity::{IdentityError, IdentityProvider};
use std::sync::Arc;
use tracing::debug;

/// Maps a username to the roles it currently holds
#[derive(Clone)]
pub struct RoleResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl RoleResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// One role per group, in the order the provider reports them.
    ///
    /// # Errors
    ///
    /// Passes through the provider's [`IdentityError`] unchanged.
    pub async fn resolve_roles(&self, username: &str) -> Result<Vec<Role>, IdentityError> {
        let groups = self.provider.users_groups(username).await?;
        debug!("User {} belongs to {} groups", username, groups.len());
        Ok(groups.into_iter().map(Role::from).collect())
    }
}
