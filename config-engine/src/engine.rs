use crate::error::{ConfigError, Result};
use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single configuration source
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// YAML or TOML file, chosen by extension
    File(PathBuf),
    /// Environment variables with the given prefix
    Env(String),
    /// Inline YAML document
    Yaml(String),
}

impl ConfigSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn env(prefix: &str) -> Self {
        Self::Env(prefix.to_string())
    }

    pub fn yaml(document: &str) -> Self {
        Self::Yaml(document.to_string())
    }
}

/// Builder collecting sources before they are merged
#[derive(Debug, Default)]
pub struct ConfigEngineBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigEngineBuilder {
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Merge all sources in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceNotFound`] for a missing file and
    /// [`ConfigError::UnsupportedFormat`] for an unknown file extension.
    pub fn build(self) -> Result<ConfigEngine> {
        let mut figment = Figment::new();

        for source in self.sources {
            figment = match source {
                ConfigSource::File(path) => {
                    if !path.is_file() {
                        return Err(ConfigError::SourceNotFound(path.display().to_string()));
                    }
                    debug!("Loading configuration file {}", path.display());
                    match path.extension().and_then(|ext| ext.to_str()) {
                        Some("yaml") | Some("yml") => figment.merge(Yaml::file(&path)),
                        Some("toml") => figment.merge(Toml::file(&path)),
                        _ => {
                            return Err(ConfigError::UnsupportedFormat(
                                path.display().to_string(),
                            ))
                        }
                    }
                }
                ConfigSource::Env(prefix) => {
                    debug!("Loading configuration from environment prefix {}", prefix);
                    figment.merge(Env::prefixed(&prefix).split("__"))
                }
                ConfigSource::Yaml(document) => figment.merge(Yaml::string(&document)),
            };
        }

        Ok(ConfigEngine { figment })
    }
}

/// Merged configuration, queried by namespace
#[derive(Debug, Clone)]
pub struct ConfigEngine {
    figment: Figment,
}

impl ConfigEngine {
    pub fn builder() -> ConfigEngineBuilder {
        ConfigEngineBuilder::default()
    }

    /// Whether a namespace is present in any source
    pub fn contains(&self, namespace: &str) -> bool {
        self.figment.contains(namespace)
    }

    /// Deserialize the object stored under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] when the namespace is missing or
    /// does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, namespace: &str) -> Result<T> {
        Ok(self.figment.extract_inner(namespace)?)
    }

    /// Like [`ConfigEngine::get`] but an absent namespace yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] when the namespace exists but does
    /// not match `T`.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, namespace: &str) -> Result<T> {
        if !self.contains(namespace) {
            debug!("Configuration namespace {} not found, using defaults", namespace);
            return Ok(T::default());
        }
        self.get(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        enabled: bool,
        retries: u32,
    }

    #[test]
    fn test_inline_yaml_namespace() {
        let engine = ConfigEngine::builder()
            .add_source(ConfigSource::yaml("sample:\n  name: primary\n  enabled: true\n"))
            .build()
            .unwrap();

        let sample: Sample = engine.get("sample").unwrap();
        assert_eq!(sample.name, "primary");
        assert!(sample.enabled);
        assert_eq!(sample.retries, 0);
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let engine = ConfigEngine::builder()
            .add_source(ConfigSource::yaml("sample:\n  name: base\n  retries: 1\n"))
            .add_source(ConfigSource::yaml("sample:\n  retries: 5\n"))
            .build()
            .unwrap();

        let sample: Sample = engine.get("sample").unwrap();
        assert_eq!(sample.name, "base");
        assert_eq!(sample.retries, 5);
    }

    #[test]
    fn test_missing_namespace() {
        let engine = ConfigEngine::builder()
            .add_source(ConfigSource::yaml("other:\n  name: x\n"))
            .build()
            .unwrap();

        assert!(!engine.contains("sample"));
        assert!(matches!(engine.get::<Sample>("sample"), Err(ConfigError::ParseError(_))));
        assert_eq!(engine.get_or_default::<Sample>("sample").unwrap(), Sample::default());
    }

    #[test]
    fn test_yaml_file_source() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "sample:\n  name: from-file\n  retries: 3").unwrap();

        let engine = ConfigEngine::builder()
            .add_source(ConfigSource::file(file.path()))
            .build()
            .unwrap();

        let sample: Sample = engine.get("sample").unwrap();
        assert_eq!(sample.name, "from-file");
        assert_eq!(sample.retries, 3);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = ConfigEngine::builder()
            .add_source(ConfigSource::file("/nonexistent/permctl.yaml"))
            .build();
        assert!(matches!(result, Err(ConfigError::SourceNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigEngine::builder()
            .add_source(ConfigSource::file(file.path()))
            .build();
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        std::env::set_var("CFGENGINE_TEST_SAMPLE__NAME", "from-env");

        let engine = ConfigEngine::builder()
            .add_source(ConfigSource::yaml("sample:\n  name: base\n"))
            .add_source(ConfigSource::env("CFGENGINE_TEST_"))
            .build()
            .unwrap();

        let sample: Sample = engine.get("sample").unwrap();
        assert_eq!(sample.name, "from-env");

        std::env::remove_var("CFGENGINE_TEST_SAMPLE__NAME");
    }
}
