use config_engine::{ConfigEngine, ConfigError};
use serde::{Deserialize, Serialize};

fn default_datasource() -> String {
    "PERMISSIONS_DB".to_string()
}

fn default_create_tables() -> bool {
    true
}

fn default_permissions_table() -> String {
    "permissions".to_string()
}

fn default_role_permissions_table() -> String {
    "role_permissions".to_string()
}

/// Settings used to open the permission store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Name of the data source holding the permission tables
    #[serde(default = "default_datasource")]
    pub datasource: String,

    /// Create the tables on first use when they are missing
    #[serde(default = "default_create_tables")]
    pub create_tables: bool,

    #[serde(default = "default_permissions_table")]
    pub permissions_table: String,

    #[serde(default = "default_role_permissions_table")]
    pub role_permissions_table: String,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            datasource: default_datasource(),
            create_tables: default_create_tables(),
            permissions_table: default_permissions_table(),
            role_permissions_table: default_role_permissions_table(),
        }
    }
}

impl PermissionConfig {
    /// Top-level configuration key holding these settings
    pub const NAMESPACE: &'static str = "permissions";

    /// Read and validate the `permissions` namespace, falling back to
    /// defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the namespace cannot be parsed or fails
    /// validation.
    pub fn load(engine: &ConfigEngine) -> Result<Self, ConfigError> {
        let config: Self = engine.get_or_default(Self::NAMESPACE)?;
        config.validate()?;
        Ok(config)
    }

    /// Table names end up in SQL text, so only plain identifiers are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasource.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "permissions.datasource must not be empty".to_string(),
            ));
        }

        for (field, value) in [
            ("permissions_table", &self.permissions_table),
            ("role_permissions_table", &self.role_permissions_table),
        ] {
            if !is_sql_identifier(value) {
                return Err(ConfigError::ValidationError(format!(
                    "permissions.{} is not a valid table name: {:?}",
                    field, value
                )));
            }
        }

        if self.permissions_table == self.role_permissions_table {
            return Err(ConfigError::ValidationError(
                "permissions_table and role_permissions_table must differ".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            value.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
