//! Collecting bound examples from a module.

use super::{BoundExample, CollectionError, ExampleId, ExampleParser, Module};
use crate::namespace::{MaterializeError, Namespace};

/// Supplies the namespace each documented function's examples run against.
///
/// This is the seam the mock engine overrides: the finder asks the resolver
/// once per example, passing the module's native globals.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn NamespaceResolver`.
pub trait NamespaceResolver: Send + Sync {
    /// Build the namespace for an example of `function` in `module`.
    fn resolve(
        &self,
        module: &str,
        function: &str,
        native: &Namespace,
    ) -> Result<Namespace, MaterializeError>;

    /// Check if the namespaces this resolver builds for `function` differ
    /// from the native globals.
    fn is_mocked(&self, _module: &str, _function: &str) -> bool {
        false
    }
}

/// Resolver returning a copy of the module's native globals.
///
/// With this resolver the finder behaves like a plain documentation test
/// finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeNamespace;

impl NamespaceResolver for NativeNamespace {
    fn resolve(
        &self,
        _module: &str,
        _function: &str,
        native: &Namespace,
    ) -> Result<Namespace, MaterializeError> {
        Ok(native.clone())
    }
}

/// Extracts examples from a module's documented items and binds each to the
/// namespace its resolver supplies.
#[derive(Clone, Copy)]
pub struct ExampleFinder<'a> {
    parser: &'a dyn ExampleParser,
    resolver: &'a dyn NamespaceResolver,
}

impl<'a> ExampleFinder<'a> {
    /// Create a finder.
    pub fn new(parser: &'a dyn ExampleParser, resolver: &'a dyn NamespaceResolver) -> Self {
        Self { parser, resolver }
    }

    /// Yield every example of every documented item in `module`, in item
    /// name order then position order.
    ///
    /// Each example gets its own namespace. A resolver failure is yielded
    /// in place of the example it affected; collection continues with the
    /// next one.
    pub fn find(
        &self,
        module: &'a Module,
    ) -> impl Iterator<Item = Result<BoundExample, CollectionError>> + 'a {
        let parser = self.parser;
        let resolver = self.resolver;
        module
            .items()
            .flat_map(move |item| bind_item(parser, resolver, module, item.name(), item.doc()))
    }

    /// Yield the examples of a single documented item, or nothing if the
    /// module does not document `function`.
    pub fn find_item(
        &self,
        module: &'a Module,
        function: &str,
    ) -> impl Iterator<Item = Result<BoundExample, CollectionError>> + 'a {
        let examples = match module.item(function) {
            Some(item) => bind_item(self.parser, self.resolver, module, item.name(), item.doc()),
            None => Vec::new(),
        };
        examples.into_iter()
    }
}

fn bind_item(
    parser: &dyn ExampleParser,
    resolver: &dyn NamespaceResolver,
    module: &Module,
    function: &str,
    doc: &str,
) -> Vec<Result<BoundExample, CollectionError>> {
    let mocked = resolver.is_mocked(module.name(), function);
    parser
        .parse(doc)
        .into_iter()
        .map(|example| {
            let namespace = resolver
                .resolve(module.name(), function, module.globals())
                .map_err(|e| {
                    CollectionError::materialize(module.name(), function, Some(example.position), e)
                })?;
            let id = ExampleId::new(module.name(), function, example.position);
            Ok(BoundExample::new(id, example, namespace, mocked))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest::{Interpreter, PromptParser};
    use crate::value::Value;

    const TWO_EXAMPLES: &str = "```\n>>> x\n1\n```\n\n```\n>>> x = 2\n>>> x\n2\n```\n";

    struct Failing;

    impl NamespaceResolver for Failing {
        fn resolve(
            &self,
            _module: &str,
            _function: &str,
            _native: &Namespace,
        ) -> Result<Namespace, MaterializeError> {
            Err(MaterializeError::InvalidKey {
                key: "bad key".to_string(),
            })
        }
    }

    fn module() -> Module {
        Module::new("m")
            .with_global("x", 1)
            .with_item("b", TWO_EXAMPLES)
            .with_item("a", "```\n>>> x\n1\n```")
            .with_item("undocumented", "No examples here.")
    }

    #[test]
    fn test_find_orders_by_item_then_position() {
        let module = module();
        let finder = ExampleFinder::new(&PromptParser, &NativeNamespace);

        let ids: Vec<String> = finder
            .find(&module)
            .map(|r| r.unwrap().id().to_string())
            .collect();
        assert_eq!(ids, vec!["m.a[0]", "m.b[0]", "m.b[1]"]);
    }

    #[test]
    fn test_each_example_gets_its_own_namespace() {
        let module = module();
        let finder = ExampleFinder::new(&PromptParser, &NativeNamespace);

        for bound in finder.find(&module) {
            let bound = bound.unwrap();
            assert!(!bound.is_mocked());
            assert!(bound.run(&Interpreter::new()).passed());
        }
        assert_eq!(module.globals().get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_resolver_failure_is_per_example() {
        let module = module();
        let finder = ExampleFinder::new(&PromptParser, &Failing);

        let results: Vec<_> = finder.find(&module).collect();
        assert_eq!(results.len(), 3);

        let error = results[2].as_ref().unwrap_err();
        assert_eq!(error.test_id(), "m.b[1]");
        assert_eq!(error.key(), Some("bad key"));
    }

    #[test]
    fn test_find_item() {
        let module = module();
        let finder = ExampleFinder::new(&PromptParser, &NativeNamespace);

        assert_eq!(finder.find_item(&module, "b").count(), 2);
        assert_eq!(finder.find_item(&module, "missing").count(), 0);
    }
}
