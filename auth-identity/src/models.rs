use serde::{Deserialize, Serialize};
use std::fmt;

/// A group as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(alias = "displayName")]
    pub display_name: String,
}

impl Group {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_accepts_scim_casing() {
        let group: Group =
            serde_json::from_str(r#"{"id":"role-analyst","displayName":"Analysts"}"#).unwrap();
        assert_eq!(group, Group::new("role-analyst", "Analysts"));
    }
}
