use auth_identity::Group;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A protected resource/action pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    pub resource: String,
    pub action: String,
}

impl Permission {
    pub fn new(resource: &str, action: &str) -> Self {
        Self {
            resource: resource.to_string(),
            action: action.to_string(),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// A group of users as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub display_name: String,
}

impl Role {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl From<Group> for Role {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            display_name: group.display_name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_equality_by_value() {
        assert_eq!(Permission::new("dashboard-1", "view"), Permission::new("dashboard-1", "view"));
        assert_ne!(Permission::new("dashboard-1", "view"), Permission::new("dashboard-1", "edit"));
        assert_eq!(Permission::new("dashboard-1", "view").to_string(), "dashboard-1:view");
    }

    #[test]
    fn test_role_from_group_copies_fields() {
        let role = Role::from(Group::new("role-analyst", "Analysts"));
        assert_eq!(role, Role::new("role-analyst", "Analysts"));
    }
}
