//! Discovery of mocked documentation tests.
//!
//! A discovery pass walks every module the registry names, collects the
//! examples of each through [`MockableExampleParser`], and returns them as
//! [`TestCase`]s ordered by module, function, and example position. The
//! pass never executes anything; running is the caller's job.
//!
//! ```text
//! MockRegistry ──modules()──▶ DiscoveryAdapter ──▶ ModuleCatalog::module
//!                                   │
//!                                   ├─▶ MockableExampleParser::find_examples
//!                                   │
//!                                   ▼
//!                   Vec<TestCase> ──augment──▶ existing TestSuite ∪ discovered
//! ```
//!
//! ## Usage
//!
//! ```
//! use mockable_doctests::discovery::{load_tests, DiscoveryOptions, TestSuite};
//! use mockable_doctests::doctest::{Catalog, Interpreter, Module};
//! use mockable_doctests::registry::MockSpecification;
//! use mockable_doctests::value::Value;
//!
//! let catalog = Catalog::new().with_module(
//!     Module::new("billing")
//!         .with_global("rate", 2)
//!         .with_function(
//!             "charge",
//!             "```\n>>> charge(10)\n100\n```",
//!             |ctx, args| {
//!                 let rate = ctx.global("rate")?.as_int().unwrap_or(0);
//!                 let amount = args.first().and_then(Value::as_int).unwrap_or(0);
//!                 Ok(Value::Int(rate * amount))
//!             },
//!         ),
//! );
//!
//! let suite = load_tests(
//!     TestSuite::new(),
//!     &catalog,
//!     MockSpecification::new().with_mock("billing", "charge", "rate", 10),
//!     DiscoveryOptions::default(),
//! );
//!
//! assert_eq!(suite.ids(), vec!["billing.charge[0]"]);
//! assert!(suite.run(&Interpreter::new()).is_success());
//! ```

mod suite;

pub use suite::{SuiteReport, TestCase, TestOutcome, TestReport, TestSuite};

use crate::doctest::{
    BoundExample, CollectionError, ExampleFinder, ExampleParser, ModuleCatalog, NativeNamespace,
    PromptParser,
};
use crate::mockable::MockableExampleParser;
use crate::namespace::MaterializeOptions;
use crate::registry::{MockRegistry, MockSpecification};
use tracing::{debug, info, warn};

/// Options for a discovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Options passed to the materializer.
    pub materialize: MaterializeOptions,
    /// Report mocks declared for functions the module does not document as
    /// collection failures.
    pub strict_functions: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            materialize: MaterializeOptions::default(),
            strict_functions: true,
        }
    }
}

impl DiscoveryOptions {
    /// Limit substitution keys to `max_depth` attribute levels.
    pub fn with_max_path_depth(mut self, max_depth: usize) -> Self {
        self.materialize = MaterializeOptions::with_max_path_depth(max_depth);
        self
    }

    /// Set whether unknown mocked functions fail collection.
    pub fn with_strict_functions(mut self, strict: bool) -> Self {
        self.strict_functions = strict;
        self
    }
}

/// Counts describing one discovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Modules named by the registry.
    pub modules: usize,
    /// Examples bound to a namespace.
    pub examples: usize,
    /// Bound examples whose namespace carries substitutions.
    pub mocked: usize,
    /// Collection failures.
    pub errors: usize,
}

impl DiscoverySummary {
    /// Summarize the cases a pass over `modules` modules produced.
    pub fn from_cases(modules: usize, cases: &[TestCase]) -> Self {
        cases.iter().fold(
            Self {
                modules,
                ..Self::default()
            },
            |mut summary, case| {
                match case {
                    TestCase::Example(bound) => {
                        summary.examples += 1;
                        summary.mocked += usize::from(bound.is_mocked());
                    }
                    TestCase::CollectionFailure(_) => summary.errors += 1,
                }
                summary
            },
        )
    }
}

/// Receives discovery progress.
///
/// All methods have no-op defaults, so an observer implements only what it
/// needs.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn DiscoveryObserver`.
pub trait DiscoveryObserver: Send + Sync {
    /// A pass is starting over `modules`.
    fn on_pass_start(&self, _modules: &[&str]) {}

    /// An example was bound to its namespace.
    fn on_example_bound(&self, _example: &BoundExample) {}

    /// An example or declaration could not be collected.
    fn on_collection_error(&self, _error: &CollectionError) {}

    /// The pass finished.
    fn on_pass_complete(&self, _summary: &DiscoverySummary) {}
}

/// Turns the registry's declarations into test cases.
///
/// An adapter holds only borrowed, read-only state; every call to
/// [`discover`](Self::discover) is a complete, independent pass.
pub struct DiscoveryAdapter<'a> {
    registry: &'a MockRegistry,
    catalog: &'a dyn ModuleCatalog,
    parser: &'a dyn ExampleParser,
    options: DiscoveryOptions,
    observer: Option<&'a dyn DiscoveryObserver>,
}

impl<'a> DiscoveryAdapter<'a> {
    /// Create an adapter using the prompt-style example extractor.
    pub fn new(registry: &'a MockRegistry, catalog: &'a dyn ModuleCatalog) -> Self {
        Self {
            registry,
            catalog,
            parser: &PromptParser,
            options: DiscoveryOptions::default(),
            observer: None,
        }
    }

    /// Use a different example extractor using builder pattern.
    pub fn with_parser(mut self, parser: &'a dyn ExampleParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set discovery options using builder pattern.
    pub fn with_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach an observer using builder pattern.
    pub fn with_observer(mut self, observer: &'a dyn DiscoveryObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The options in effect.
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Run one discovery pass.
    ///
    /// Every module named by the registry is searched. A module missing
    /// from the catalog, or (with `strict_functions`) a mocked function the
    /// module does not document, becomes a collection failure, as does
    /// every example whose substitutions cannot be applied.
    pub fn discover(&self) -> Vec<TestCase> {
        let modules = self.registry.modules();
        info!(modules = modules.len(), "starting mock discovery pass");
        if let Some(observer) = self.observer {
            observer.on_pass_start(&modules);
        }

        let parser = MockableExampleParser::new(self.registry, self.parser)
            .with_options(self.options.materialize);

        let mut cases = Vec::new();
        for name in &modules {
            let Some(module) = self.catalog.module(name) else {
                cases.push(TestCase::CollectionFailure(CollectionError::UnknownModule {
                    module: name.to_string(),
                }));
                continue;
            };

            if self.options.strict_functions {
                cases.extend(
                    self.registry
                        .functions(name)
                        .into_iter()
                        .filter(|function| module.item(function).is_none())
                        .map(|function| {
                            TestCase::CollectionFailure(CollectionError::UnknownFunction {
                                module: name.to_string(),
                                function: function.to_string(),
                            })
                        }),
                );
            }

            cases.extend(parser.find_examples(module).map(TestCase::from));
        }

        cases.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        for case in &cases {
            self.record(case);
        }
        let summary = DiscoverySummary::from_cases(modules.len(), &cases);
        info!(
            examples = summary.examples,
            mocked = summary.mocked,
            errors = summary.errors,
            "mock discovery pass complete"
        );
        if let Some(observer) = self.observer {
            observer.on_pass_complete(&summary);
        }

        cases
    }

    /// Return `existing` extended with a fresh discovery pass.
    pub fn augment(&self, existing: TestSuite) -> TestSuite {
        let mut suite = existing;
        suite.extend(self.discover());
        suite
    }

    fn record(&self, case: &TestCase) {
        match case {
            TestCase::Example(bound) => {
                debug!(example = %bound.id(), mocked = bound.is_mocked(), "bound example");
                if let Some(observer) = self.observer {
                    observer.on_example_bound(bound);
                }
            }
            TestCase::CollectionFailure(error) => {
                warn!(test = %error.test_id(), error = %error, "collection failed");
                if let Some(observer) = self.observer {
                    observer.on_collection_error(error);
                }
            }
        }
    }
}

/// Register mocked documentation tests with an existing suite.
///
/// Builds a registry from `specification`, runs one discovery pass over
/// `catalog`, and returns `existing` augmented with the result. The
/// registry is dropped before returning.
pub fn load_tests(
    existing: TestSuite,
    catalog: &dyn ModuleCatalog,
    specification: MockSpecification,
    options: DiscoveryOptions,
) -> TestSuite {
    let registry = MockRegistry::new(specification);
    DiscoveryAdapter::new(&registry, catalog)
        .with_options(options)
        .augment(existing)
}

/// Collect the unmocked documentation tests of `modules`, or of every
/// module in the catalog when `modules` is empty.
pub fn native_tests(catalog: &dyn ModuleCatalog, modules: &[&str]) -> TestSuite {
    native_tests_with(catalog, modules, &PromptParser)
}

/// Like [`native_tests`], extracting examples with `parser`.
///
/// Pass the same parser given to [`DiscoveryAdapter::with_parser`] so the
/// native and mocked suites agree on what counts as an example.
pub fn native_tests_with(
    catalog: &dyn ModuleCatalog,
    modules: &[&str],
    parser: &dyn ExampleParser,
) -> TestSuite {
    let names = if modules.is_empty() {
        catalog.module_names()
    } else {
        modules.to_vec()
    };
    let finder = ExampleFinder::new(parser, &NativeNamespace);

    let mut suite = TestSuite::new();
    for name in names {
        match catalog.module(name) {
            Some(module) => suite.extend(finder.find(module).map(TestCase::from)),
            None => suite.add(CollectionError::UnknownModule {
                module: name.to_string(),
            }),
        }
    }
    suite
}
