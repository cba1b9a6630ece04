use crate::{error::IdentityError, models::Group};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Source of group membership for users
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Groups the user currently belongs to, in provider order
    async fn users_groups(&self, username: &str) -> Result<Vec<Group>, IdentityError>;
}

/// In-memory identity provider for testing and development
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    users: Arc<DashMap<String, Vec<Group>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, replacing any previous membership
    pub fn add_user(&self, username: &str, groups: Vec<Group>) {
        self.users.insert(username.to_string(), groups);
    }

    pub fn remove_user(&self, username: &str) {
        self.users.remove(username);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn users_groups(&self, username: &str) -> Result<Vec<Group>, IdentityError> {
        debug!("Resolving groups for user {}", username);
        self.users
            .get(username)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| IdentityError::UserNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_provider() {
        let provider = InMemoryIdentityProvider::new();
        provider.add_user(
            "alice",
            vec![Group::new("role-analyst", "Analysts"), Group::new("role-admin", "Admins")],
        );
        provider.add_user("bob", vec![]);

        let groups = provider.users_groups("alice").await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "role-analyst");
        assert_eq!(groups[1].id, "role-admin");

        assert!(provider.users_groups("bob").await.unwrap().is_empty());

        provider.remove_user("alice");
        assert!(matches!(
            provider.users_groups("alice").await,
            Err(IdentityError::UserNotFound(user)) if user == "alice"
        ));
    }
}
