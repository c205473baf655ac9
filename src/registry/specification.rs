//! The declarative mock specification supplied by the test author.

use crate::namespace::SubstitutionMap;
use crate::value::Value;
use std::collections::BTreeMap;

/// Nested mapping of module name to function name to substitutions.
///
/// Module and function names are the identifiers the module catalog uses.
/// Maps are ordered, so iteration is deterministic regardless of the order
/// mocks were declared in.
///
/// # Example
///
/// ```
/// use mockable_doctests::registry::{MockSpecification, SubstitutionMap};
///
/// let spec = MockSpecification::new()
///     .with_mock("flintstone", "fred", "fred", 10)
///     .with_substitutions(
///         "flintstone",
///         "barney",
///         SubstitutionMap::new().with("rubble", true),
///     );
///
/// assert_eq!(spec.module_count(), 1);
/// assert_eq!(spec.function_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockSpecification {
    modules: BTreeMap<String, BTreeMap<String, SubstitutionMap>>,
}

impl MockSpecification {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one substitution using builder pattern.
    pub fn with_mock(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(module, function, key, value);
        self
    }

    /// Declare a set of substitutions for one function using builder pattern.
    ///
    /// Entries are added to any substitutions already declared for the
    /// function.
    pub fn with_substitutions(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        substitutions: SubstitutionMap,
    ) -> Self {
        self.insert_substitutions(module, function, substitutions);
        self
    }

    /// Declare one substitution, returning the value it replaced if any.
    pub fn insert(
        &mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.entry(module.into(), function.into()).insert(key, value)
    }

    /// Declare a set of substitutions for one function.
    pub fn insert_substitutions(
        &mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        substitutions: SubstitutionMap,
    ) {
        self.entry(module.into(), function.into())
            .extend(substitutions);
    }

    /// Merge another specification into this one.
    ///
    /// Declarations from `other` win when both declare the same key for the
    /// same function; all other declarations are kept.
    pub fn merge(&mut self, other: MockSpecification) {
        for (module, functions) in other.modules {
            for (function, substitutions) in functions {
                self.insert_substitutions(module.clone(), function, substitutions);
            }
        }
    }

    /// Get the substitutions declared for a function.
    pub fn get(&self, module: &str, function: &str) -> Option<&SubstitutionMap> {
        self.modules.get(module)?.get(function)
    }

    /// Iterate over modules and their per-function substitutions, in name
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, SubstitutionMap>)> {
        self.modules.iter()
    }

    /// Number of modules with declarations.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of functions with declarations, across all modules.
    pub fn function_count(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    /// Check if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn entry(&mut self, module: String, function: String) -> &mut SubstitutionMap {
        self.modules
            .entry(module)
            .or_default()
            .entry(function)
            .or_default()
    }
}

impl FromIterator<(String, String, SubstitutionMap)> for MockSpecification {
    fn from_iter<T: IntoIterator<Item = (String, String, SubstitutionMap)>>(iter: T) -> Self {
        let mut spec = Self::new();
        for (module, function, substitutions) in iter {
            spec.insert_substitutions(module, function, substitutions);
        }
        spec
    }
}
