//! Mockable Doctests - mock injection for documentation examples
//!
//! Documentation examples run against the global namespace of the module
//! that defines them. This crate lets a test author declare, per documented
//! function, bindings to substitute in that namespace, so an example can run
//! against a stubbed clock, a fake gateway, or a tweaked config object
//! without touching the module itself or any other example.
//!
//! - **`value`** - Dynamic values, copy-on-write objects, native functions
//! - **`namespace`** - Execution namespaces and the substitution materializer
//! - **`registry`** - The mock specification and its read-only registry
//! - **`doctest`** - Example extraction, binding, and execution
//! - **`mockable`** - Mock-aware example collection
//! - **`discovery`** - Discovery passes producing test suites
//! - **`config`** - TOML/JSON mock configuration and `.env` loading
//! - **`observability`** - Markdown discovery log
//!
//! # Features
//!
//! Enable the features you need in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mockable-doctests = { version = "0.1", default-features = false }
//! # Or enable configuration loading only:
//! mockable-doctests = { version = "0.1", default-features = false, features = ["config"] }
//! # Or enable everything:
//! mockable-doctests = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Example
//!
//! ```
//! use mockable_doctests::prelude::*;
//!
//! let catalog = Catalog::new().with_module(
//!     Module::new("clock")
//!         .with_global("now", Callable::returning("now", Value::Int(1_700_000_000)))
//!         .with_function(
//!             "stamp",
//!             "```\n>>> stamp()\n'at 0'\n```",
//!             |ctx, _| {
//!                 let now = ctx.call_global("now", &[])?;
//!                 Ok(Value::from(format!("at {}", now)))
//!             },
//!         ),
//! );
//!
//! let specification = MockSpecification::new().with_mock(
//!     "clock",
//!     "stamp",
//!     "now",
//!     Callable::returning("now", Value::Int(0)),
//! );
//!
//! let suite = load_tests(TestSuite::new(), &catalog, specification, DiscoveryOptions::default());
//! assert!(suite.run(&Interpreter::new()).is_success());
//! ```

#![warn(missing_docs)]

pub mod discovery;
pub mod doctest;
pub mod mockable;
pub mod namespace;
pub mod registry;
pub mod value;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Observability utilities (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::discovery::{
        load_tests, native_tests, native_tests_with, DiscoveryAdapter, DiscoveryObserver,
        DiscoveryOptions, TestCase, TestSuite,
    };
    pub use crate::doctest::{
        BoundExample, Catalog, CollectionError, ExampleExecutor, ExampleParser, Interpreter,
        Module, ModuleCatalog, PromptParser,
    };
    pub use crate::mockable::MockableExampleParser;
    pub use crate::namespace::{materialize, MaterializeError, MaterializeOptions, Namespace};
    pub use crate::registry::{MockLookup, MockRegistry, MockSpecification, SubstitutionMap};
    pub use crate::value::{CallContext, Callable, HostObject, Object, Record, Value};

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::DiscoveryLogger;
}
