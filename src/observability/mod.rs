//! Observability for discovery passes.
//!
//! Structured diagnostics always go through `tracing`. This module adds a
//! persistent markdown log of discovery passes and test runs.
//!
//! # Example
//!
//! ```no_run
//! use mockable_doctests::discovery::DiscoveryAdapter;
//! use mockable_doctests::doctest::Catalog;
//! use mockable_doctests::observability::DiscoveryLogger;
//! use mockable_doctests::registry::MockRegistry;
//!
//! // Create a logger
//! let logger = DiscoveryLogger::new(None, Some("DEBUG")).unwrap();
//!
//! // Record a discovery pass
//! let catalog = Catalog::new();
//! let registry = MockRegistry::default();
//! let cases = DiscoveryAdapter::new(&registry, &catalog)
//!     .with_observer(&logger)
//!     .discover();
//!
//! println!("{} tests, log at {}", cases.len(), logger.log_file().display());
//! ```

pub mod logger;

// Re-export main types for convenience
pub use logger::DiscoveryLogger;
