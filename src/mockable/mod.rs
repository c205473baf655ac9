//! Mock-aware example collection.
//!
//! [`MockableExampleParser`] plugs into the documentation-test finder as a
//! [`NamespaceResolver`]: for every example of a documented function it
//! asks the registry for substitutions and, when there are any, builds the
//! example's namespace through the materializer instead of copying the
//! module's globals.
//!
//! ```text
//!   Module ──▶ ExampleFinder ──resolve(module, function)──▶ MockableExampleParser
//!                                                               │
//!                                   MockLookup::lookup ◀────────┤
//!                                                               ▼
//!                                        empty? ── yes ──▶ native globals (copy)
//!                                          │
//!                                          no ──▶ materialize(globals, subs)
//! ```
//!
//! # Example
//!
//! ```
//! use mockable_doctests::doctest::{Interpreter, Module};
//! use mockable_doctests::mockable::MockableExampleParser;
//! use mockable_doctests::registry::{MockRegistry, MockSpecification};
//! use mockable_doctests::value::Value;
//!
//! let module = Module::new("weather")
//!     .with_global("sensor", Value::Int(18))
//!     .with_function(
//!         "report",
//!         "```\n>>> report()\n'mild'\n```",
//!         |ctx, _| match ctx.global("sensor")?.as_int() {
//!             Some(t) if t > 25 => Ok(Value::from("hot")),
//!             _ => Ok(Value::from("mild")),
//!         },
//!     )
//!     .with_function(
//!         "alert",
//!         "```\n>>> report()\n'hot'\n```",
//!         |_, _| Ok(Value::None),
//!     );
//!
//! let registry = MockRegistry::new(
//!     MockSpecification::new().with_mock("weather", "alert", "sensor", 40),
//! );
//! let parser = MockableExampleParser::with_prompt_parser(&registry);
//!
//! for bound in parser.find_examples(&module) {
//!     let bound = bound.unwrap();
//!     assert!(bound.run(&Interpreter::new()).passed());
//! }
//! ```

pub use crate::doctest::BoundExample;

use crate::doctest::{
    CollectionError, ExampleFinder, ExampleParser, Module, NamespaceResolver, PromptParser,
};
use crate::namespace::{materialize, MaterializeError, MaterializeOptions, Namespace};
use crate::registry::MockLookup;
use tracing::debug;

/// Example collector that binds each example to a namespace with the
/// registered substitutions applied.
#[derive(Clone, Copy)]
pub struct MockableExampleParser<'r> {
    lookup: &'r dyn MockLookup,
    parser: &'r dyn ExampleParser,
    options: MaterializeOptions,
}

impl<'r> MockableExampleParser<'r> {
    /// Create a parser over a registry and an example extractor.
    pub fn new(lookup: &'r dyn MockLookup, parser: &'r dyn ExampleParser) -> Self {
        Self {
            lookup,
            parser,
            options: MaterializeOptions::default(),
        }
    }

    /// Create a parser using the prompt-style example extractor.
    pub fn with_prompt_parser(lookup: &'r dyn MockLookup) -> Self {
        Self::new(lookup, &PromptParser)
    }

    /// Set materialization options using builder pattern.
    pub fn with_options(mut self, options: MaterializeOptions) -> Self {
        self.options = options;
        self
    }

    /// The materialization options in effect.
    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Yield a bound example for every example of every documented item in
    /// `module`.
    ///
    /// Examples of functions without substitutions run against a copy of
    /// the module's globals. A function whose substitutions cannot be
    /// applied yields one error per example, naming the module, function,
    /// position, and key.
    pub fn find_examples<'a>(
        &'a self,
        module: &'a Module,
    ) -> impl Iterator<Item = Result<BoundExample, CollectionError>> + 'a
    where
        'r: 'a,
    {
        ExampleFinder::new(self.parser, self).find(module)
    }

    /// Yield the bound examples of one documented function in `module`.
    pub fn find_function_examples<'a>(
        &'a self,
        module: &'a Module,
        function: &str,
    ) -> impl Iterator<Item = Result<BoundExample, CollectionError>> + 'a
    where
        'r: 'a,
    {
        ExampleFinder::new(self.parser, self).find_item(module, function)
    }
}

impl NamespaceResolver for MockableExampleParser<'_> {
    fn resolve(
        &self,
        module: &str,
        function: &str,
        native: &Namespace,
    ) -> Result<Namespace, MaterializeError> {
        let substitutions = self.lookup.lookup(module, function);
        if substitutions.is_empty() {
            return Ok(native.clone());
        }

        debug!(
            module,
            function,
            keys = ?substitutions.keys(),
            "materializing mocked namespace"
        );
        materialize(native, substitutions, &self.options)
    }

    fn is_mocked(&self, module: &str, function: &str) -> bool {
        self.lookup.has_mocks(module, function)
    }
}
