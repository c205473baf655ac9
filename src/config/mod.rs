//! Configuration management for mock declarations.
//!
//! This module loads literal mocks and discovery options from a TOML (or
//! JSON) file, and environment variables from an optional `.env` file.
//!
//! # Example
//!
//! ```no_run
//! use mockable_doctests::config::{ConfigurationLoader, EnvironmentLoader};
//! use mockable_doctests::discovery::{load_tests, TestSuite};
//! use mockable_doctests::doctest::Catalog;
//!
//! // Load environment variables
//! let env = EnvironmentLoader::new(None);
//!
//! // Load configuration from the file MOCKABLE_DOCTESTS_CONFIG names
//! let loader = ConfigurationLoader::from_environment(&env).unwrap();
//!
//! let catalog = Catalog::new();
//! let suite = load_tests(
//!     TestSuite::new(),
//!     &catalog,
//!     loader.specification(),
//!     loader.discovery_options(),
//! );
//! println!("Discovered {} tests", suite.len());
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{
    Configuration, ConfigurationLoader, DiscoveryConfig, Literal, LoggingConfig, MockTable,
    DEFAULT_CONFIG_FILE,
};
pub use self::environment::{EnvironmentLoader, CONFIG_ENV_VAR, LOG_LEVEL_ENV_VAR};
