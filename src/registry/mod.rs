//! Mock Registry Module
//!
//! Holds the caller-supplied mock specification and answers the question
//! "which substitutions apply to function F in module M?".
//!
//! The specification is a nested mapping:
//!
//! ```text
//! module ──▶ function ──▶ substitution key ──▶ replacement value
//! "billing"  "charge"     "rate"               10
//!                         "gateway.endpoint"   "http://stub"
//! ```
//!
//! ## Usage
//!
//! ```
//! use mockable_doctests::registry::{MockLookup, MockRegistry, MockSpecification};
//! use mockable_doctests::value::Value;
//!
//! let spec = MockSpecification::new()
//!     .with_mock("billing", "charge", "rate", 10)
//!     .with_mock("billing", "charge", "gateway.endpoint", "http://stub");
//!
//! let registry = MockRegistry::new(spec);
//!
//! let substitutions = registry.lookup("billing", "charge");
//! assert_eq!(substitutions.get("rate"), Some(&Value::Int(10)));
//!
//! // Absence of mocks is the default, not an error.
//! assert!(registry.lookup("billing", "refund").is_empty());
//! ```

mod registry;
mod specification;

pub use crate::namespace::SubstitutionMap;
pub use registry::{MockLookup, MockRegistry};
pub use specification::MockSpecification;
