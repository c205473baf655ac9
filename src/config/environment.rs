//! Environment variable loading.

use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MOCKABLE_DOCTESTS_CONFIG";

/// Environment variable naming the discovery log level.
pub const LOG_LEVEL_ENV_VAR: &str = "MOCKABLE_DOCTESTS_LOG_LEVEL";

/// Loads environment variables from a .env file and the process environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file. Nothing is loaded when None.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only an explicit path is loaded, so stray .env files in the
        // working directory never change test behavior.
        if let Some(path) = env_file.filter(|p| p.exists()) {
            if let Err(e) = dotenv::from_path(path) {
                warn!(path = %path.display(), error = %e, "failed to load .env file");
            }
        }

        Self {
            env_file: env_file.map(Path::to_path_buf),
        }
    }

    /// The .env file this loader was created with.
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Configuration file path from `MOCKABLE_DOCTESTS_CONFIG`.
    pub fn config_path(&self) -> Option<PathBuf> {
        env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// Log level from `MOCKABLE_DOCTESTS_LOG_LEVEL`.
    pub fn log_level(&self) -> Option<String> {
        env::var(LOG_LEVEL_ENV_VAR).ok().filter(|v| !v.is_empty())
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
