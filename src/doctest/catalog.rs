//! The table of modules, their globals, and their documented items.

use crate::namespace::Namespace;
use crate::value::{CallContext, Callable, Value};
use std::collections::BTreeMap;

/// An item (function, type, or object) carrying documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedItem {
    name: String,
    doc: String,
}

impl DocumentedItem {
    /// Create a documented item.
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
        }
    }

    /// The item's name within its module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item's documentation text.
    pub fn doc(&self) -> &str {
        &self.doc
    }
}

/// A module: its native global namespace and its documented items.
///
/// Documented items run their examples against the module's globals, the
/// same way a function resolves free names through the module that
/// defines it.
///
/// # Example
///
/// ```
/// use mockable_doctests::doctest::Module;
/// use mockable_doctests::value::Value;
///
/// let module = Module::new("shop")
///     .with_global("tax_rate", Value::Int(20))
///     .with_item("Cart", "A shopping cart.");
///
/// assert_eq!(module.name(), "shop");
/// assert!(module.globals().contains("tax_rate"));
/// assert!(module.item("Cart").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    globals: Namespace,
    items: BTreeMap<String, DocumentedItem>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Bind a global using builder pattern.
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.globals.insert(name, value.into());
        self
    }

    /// Add a documented item using builder pattern.
    pub fn with_item(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.add_item(DocumentedItem::new(name, doc));
        self
    }

    /// Bind a native function as a global and document it, using builder
    /// pattern.
    pub fn with_function<F>(self, name: impl Into<String>, doc: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut CallContext<'_>, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::new(name.clone(), func);
        self.with_global(name.clone(), callable).with_item(name, doc)
    }

    /// Bind a value as a global and document it under the same name, using
    /// builder pattern.
    pub fn with_documented(
        self,
        name: impl Into<String>,
        doc: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let name = name.into();
        self.with_global(name.clone(), value).with_item(name, doc)
    }

    /// Add a documented item, replacing any item with the same name.
    pub fn add_item(&mut self, item: DocumentedItem) -> Option<DocumentedItem> {
        self.items.insert(item.name.clone(), item)
    }

    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module's native global namespace.
    pub fn globals(&self) -> &Namespace {
        &self.globals
    }

    /// Mutable access to the native globals, for building the module.
    pub fn globals_mut(&mut self) -> &mut Namespace {
        &mut self.globals
    }

    /// Get a documented item by name.
    pub fn item(&self, name: &str) -> Option<&DocumentedItem> {
        self.items.get(name)
    }

    /// Iterate over documented items in name order.
    pub fn items(&self) -> impl Iterator<Item = &DocumentedItem> {
        self.items.values()
    }

    /// Number of documented items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Resolves module names to modules.
///
/// This is the native-namespace accessor the harness builds ahead of time
/// in place of runtime reflection.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn ModuleCatalog`.
pub trait ModuleCatalog {
    /// Get a module by name.
    fn module(&self, name: &str) -> Option<&Module>;

    /// Names of all modules, in order.
    fn module_names(&self) -> Vec<&str>;

    /// Check if a module exists.
    fn contains_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }
}

/// Default [`ModuleCatalog`] backed by an ordered map.
///
/// # Example
///
/// ```
/// use mockable_doctests::doctest::{Catalog, Module, ModuleCatalog};
///
/// let catalog = Catalog::new()
///     .with_module(Module::new("b"))
///     .with_module(Module::new("a"));
///
/// assert_eq!(catalog.module_names(), vec!["a", "b"]);
/// assert!(catalog.contains_module("a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: BTreeMap<String, Module>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module using builder pattern.
    pub fn with_module(mut self, module: Module) -> Self {
        self.register(module);
        self
    }

    /// Register a module, replacing any module with the same name.
    pub fn register(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.name.clone(), module)
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleCatalog for Catalog {
    fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(|s| s.as_str()).collect()
    }
}

impl FromIterator<Module> for Catalog {
    fn from_iter<T: IntoIterator<Item = Module>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for module in iter {
            catalog.register(module);
        }
        catalog
    }
}
