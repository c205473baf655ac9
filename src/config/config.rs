//! TOML and JSON configuration parsing.

use crate::discovery::DiscoveryOptions;
use crate::namespace::MaterializeOptions;
use crate::registry::MockSpecification;
use crate::value::{Record, Value};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mockable-doctests.toml";

/// Module name -> function name -> substitution key -> literal.
pub type MockTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, Literal>>>;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// The `[discovery]` section.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// The `[logging]` section.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Literal mocks, keyed by module then function.
    #[serde(default)]
    pub mocks: MockTable,
}

/// Discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Maximum attribute depth of substitution keys. Unlimited when absent.
    pub max_path_depth: Option<usize>,
    /// Fail collection for mocks naming undocumented functions.
    #[serde(default = "default_strict_functions")]
    pub strict_functions: bool,
}

fn default_strict_functions() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_path_depth: None,
            strict_functions: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Discovery log file. `DiscoveryLogger::from_config` uses a
    /// timestamped file in the temp directory when absent.
    pub log_file: Option<String>,
    /// Discovery log level (`INFO` or `DEBUG`).
    pub log_level: Option<String>,
}

/// A replacement value written literally in a configuration file.
///
/// Tables become objects of type `table` whose attributes are the table's
/// entries, so dotted keys can be substituted into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// An array.
    List(Vec<Literal>),
    /// A table.
    Table(BTreeMap<String, Literal>),
    /// JSON `null`, mapped to `None`.
    Null,
}

impl Literal {
    /// Convert to a runtime value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::List(items) => Value::List(items.iter().map(Literal::to_value).collect()),
            Literal::Table(entries) => entries
                .iter()
                .fold(Record::new("table"), |record, (name, literal)| {
                    record.with(name.clone(), literal.to_value())
                })
                .into(),
            Literal::Null => Value::None,
        }
    }
}

/// Loads and manages the mock configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    /// The file the configuration was read from, or would have been.
    pub config_path: PathBuf,
    /// The parsed configuration.
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to a `.toml` or `.json` config file. If None,
    ///   uses `mockable-doctests.toml` when present, else the defaults.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            debug!(path = %config_path.display(), "config file not found, using defaults");
            Configuration::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            config,
        }
    }

    /// Load configuration from the file the environment names, if any.
    pub fn from_environment(env: &super::EnvironmentLoader) -> Result<Self> {
        Self::new(env.config_path().as_deref())
    }

    /// Load configuration from a file, choosing the format by extension.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Build the mock specification the configuration declares.
    pub fn specification(&self) -> MockSpecification {
        let mut specification = MockSpecification::new();
        for (module, functions) in &self.config.mocks {
            for (function, substitutions) in functions {
                for (key, literal) in substitutions {
                    specification.insert(
                        module.clone(),
                        function.clone(),
                        key.clone(),
                        literal.to_value(),
                    );
                }
            }
        }
        specification
    }

    /// Discovery options from the `[discovery]` section.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            materialize: MaterializeOptions {
                max_path_depth: self.config.discovery.max_path_depth,
            },
            strict_functions: self.config.discovery.strict_functions,
        }
    }

    /// Configured log file, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.config.logging.log_file.as_deref().map(Path::new)
    }

    /// Configured log level, `INFO` when unset.
    pub fn log_level(&self) -> &str {
        self.config.logging.log_level.as_deref().unwrap_or("INFO")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[discovery]
max_path_depth = 1
strict_functions = false

[logging]
log_level = "DEBUG"

[mocks.billing.charge]
rate = 10
ratio = 0.5
enabled = true
"gateway.endpoint" = "http://stub"
codes = [1, 2]

[mocks.billing.charge.client]
name = "stub"
retries = 0
"#;

    #[test]
    fn test_load_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mocks.toml");
        fs::write(&path, SAMPLE).unwrap();

        let loader = ConfigurationLoader::new(Some(&path)).unwrap();
        assert_eq!(loader.config.discovery.max_path_depth, Some(1));
        assert_eq!(loader.log_level(), "DEBUG");

        let options = loader.discovery_options();
        assert!(!options.strict_functions);
        assert_eq!(options.materialize.max_path_depth, Some(1));

        let spec = loader.specification();
        let subs = spec.get("billing", "charge").unwrap();
        assert_eq!(subs.get("rate"), Some(&Value::Int(10)));
        assert_eq!(subs.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(subs.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(subs.get("gateway.endpoint"), Some(&Value::from("http://stub")));
        assert_eq!(
            subs.get("codes"),
            Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
        );

        let client = subs.get("client").unwrap().as_object().unwrap();
        assert_eq!(client.type_name(), "table");
        assert_eq!(client.get_attr("name"), Some(Value::from("stub")));
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mocks.json");
        fs::write(
            &path,
            r#"{"mocks": {"app": {"run": {"debug": null, "level": 3}}}}"#,
        )
        .unwrap();

        let loader = ConfigurationLoader::new(Some(&path)).unwrap();
        let spec = loader.specification();
        let subs = spec.get("app", "run").unwrap();
        assert_eq!(subs.get("debug"), Some(&Value::None));
        assert_eq!(subs.get("level"), Some(&Value::Int(3)));
        assert!(loader.discovery_options().strict_functions);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let loader = ConfigurationLoader::new(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(loader.config, Configuration::default());
        assert!(loader.specification().is_empty());
        assert_eq!(loader.discovery_options(), DiscoveryOptions::default());
        assert_eq!(loader.log_level(), "INFO");
        assert!(loader.log_file().is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[mocks\n").unwrap();

        let error = ConfigurationLoader::new(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_from_config() {
        let mut config = Configuration::default();
        config
            .mocks
            .entry("m".to_string())
            .or_default()
            .entry("f".to_string())
            .or_default()
            .insert("x".to_string(), Literal::Str("y".to_string()));

        let loader = ConfigurationLoader::from_config(config);
        assert_eq!(loader.specification().function_count(), 1);
    }
}
