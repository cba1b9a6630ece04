use auth_identity::IdentityConfig;
use auth_permissions::PermissionConfig;
use config_engine::{ConfigEngine, ConfigError, ConfigSource};
use database_layer::DataSourceConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Used when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_FILE: &str = "permctl.yaml";

/// Prefix of environment overrides, e.g. `PERMCTL_PERMISSIONS__DATASOURCE`
pub const ENV_PREFIX: &str = "PERMCTL_";

/// Everything `permctl` reads from its configuration sources
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub permissions: PermissionConfig,
    pub datasources: Vec<DataSourceConfig>,
    pub identity: Option<IdentityConfig>,
}

impl CliConfig {
    /// Load from an explicit file, or from `permctl.yaml` when present,
    /// followed by environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if an explicit file is missing or any
    /// section fails to parse or validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigEngine::builder();

        match path {
            Some(path) => builder = builder.add_source(ConfigSource::file(path)),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    builder = builder.add_source(ConfigSource::file(default_path));
                } else {
                    debug!("No {} found, using environment only", DEFAULT_CONFIG_FILE);
                }
            }
        }

        let engine = builder.add_source(ConfigSource::env(ENV_PREFIX)).build()?;
        Self::from_engine(&engine)
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any section fails to parse or validate.
    pub fn from_engine(engine: &ConfigEngine) -> Result<Self, ConfigError> {
        let identity = if engine.contains("identity") {
            Some(engine.get("identity")?)
        } else {
            None
        };

        Ok(Self {
            permissions: PermissionConfig::load(engine)?,
            datasources: engine.get_or_default("datasources")?,
            identity,
        })
    }
}
