//! Read-only registry answering substitution lookups.

use std::collections::BTreeMap;

use super::MockSpecification;
use crate::namespace::SubstitutionMap;

/// Shared empty map returned for lookup misses.
static NO_SUBSTITUTIONS: SubstitutionMap = SubstitutionMap::new();

/// Lookup of the substitutions that apply to a documented function.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn MockLookup`.
///
/// # Example
///
/// ```
/// use mockable_doctests::registry::{MockLookup, MockRegistry, MockSpecification};
///
/// fn mocked(lookup: &dyn MockLookup, module: &str, function: &str) -> bool {
///     !lookup.lookup(module, function).is_empty()
/// }
///
/// let registry = MockRegistry::new(MockSpecification::new().with_mock("m", "f", "x", 1));
/// assert!(mocked(&registry, "m", "f"));
/// assert!(!mocked(&registry, "m", "g"));
/// ```
pub trait MockLookup: Send + Sync {
    /// Get the substitutions for `function` in `module`.
    ///
    /// Returns an empty map when nothing is declared; a miss is not an
    /// error.
    fn lookup(&self, module: &str, function: &str) -> &SubstitutionMap;

    /// Check if any substitution is declared for `function` in `module`.
    fn has_mocks(&self, module: &str, function: &str) -> bool {
        !self.lookup(module, function).is_empty()
    }
}

/// Registry built from a [`MockSpecification`] for one discovery pass.
///
/// The registry is read-only after construction. Drop it when the pass is
/// done; nothing it holds outlives the run.
///
/// # Example
///
/// ```
/// use mockable_doctests::registry::{MockLookup, MockRegistry, MockSpecification};
///
/// let registry = MockRegistry::new(
///     MockSpecification::new()
///         .with_mock("app.clock", "now", "time_source", 0)
///         .with_mock("app.clock", "today", "calendar.year", 2000),
/// );
///
/// assert_eq!(registry.modules(), vec!["app.clock"]);
/// assert_eq!(registry.functions("app.clock"), vec!["now", "today"]);
/// assert!(!registry.lookup_qualified("app.clock.now").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    specification: MockSpecification,
}

impl MockRegistry {
    /// Create a registry owning `specification`.
    pub fn new(specification: MockSpecification) -> Self {
        Self { specification }
    }

    /// The specification this registry was built from.
    pub fn specification(&self) -> &MockSpecification {
        &self.specification
    }

    /// Names of all modules with declarations, in order.
    pub fn modules(&self) -> Vec<&str> {
        self.specification.iter().map(|(m, _)| m.as_str()).collect()
    }

    /// Names of all functions with declarations in `module`, in order.
    ///
    /// Returns an empty list for unknown modules.
    pub fn functions(&self, module: &str) -> Vec<&str> {
        self.specification
            .iter()
            .find(|(m, _)| m.as_str() == module)
            .map(|(_, functions)| functions.keys().map(|f| f.as_str()).collect())
            .unwrap_or_default()
    }

    /// Flatten the specification to qualified `module.function` names.
    pub fn flatten(&self) -> BTreeMap<String, &SubstitutionMap> {
        self.specification
            .iter()
            .flat_map(|(module, functions)| {
                functions
                    .iter()
                    .map(move |(function, subs)| (format!("{}.{}", module, function), subs))
            })
            .collect()
    }

    /// Look up substitutions by qualified name, splitting the module from
    /// the function at the last `.`.
    ///
    /// Module names may contain dots but function identifiers may not: a
    /// nested item declared as `"Class.method"` is only reachable through
    /// [`lookup`](MockLookup::lookup).
    pub fn lookup_qualified(&self, qualified_name: &str) -> &SubstitutionMap {
        match qualified_name.rsplit_once('.') {
            Some((module, function)) => self.lookup(module, function),
            None => &NO_SUBSTITUTIONS,
        }
    }

    /// Number of functions with declarations.
    pub fn len(&self) -> usize {
        self.specification.function_count()
    }

    /// Check if the registry declares nothing.
    pub fn is_empty(&self) -> bool {
        self.specification.is_empty()
    }
}

impl MockLookup for MockRegistry {
    fn lookup(&self, module: &str, function: &str) -> &SubstitutionMap {
        self.specification
            .get(module, function)
            .unwrap_or(&NO_SUBSTITUTIONS)
    }
}

impl From<MockSpecification> for MockRegistry {
    fn from(specification: MockSpecification) -> Self {
        Self::new(specification)
    }
}
