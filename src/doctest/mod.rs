//! Documentation example extraction and execution.
//!
//! This is the documentation-test mechanism the mock engine plugs into:
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌────────────────────┐
//! │ ModuleCatalog│──▶│ ExampleParser │──▶│ NamespaceResolver  │
//! │ (globals +   │   │ (doc text ─▶  │   │ (native globals ─▶ │
//! │  doc items)  │   │  examples)    │   │  example namespace)│
//! └──────────────┘   └───────────────┘   └─────────┬──────────┘
//!                                                  ▼
//!                         ExampleFinder ──▶ BoundExample ──run──▶ ExampleReport
//!                                                  │
//!                                          ExampleExecutor
//! ```
//!
//! [`ExampleFinder`] accepts any [`NamespaceResolver`]; [`NativeNamespace`]
//! reproduces plain documentation tests, and the mock engine supplies its
//! own resolver to substitute bindings.
//!
//! # Example
//!
//! ```
//! use mockable_doctests::doctest::{
//!     ExampleFinder, Interpreter, Module, NativeNamespace, PromptParser,
//! };
//! use mockable_doctests::value::Value;
//!
//! let module = Module::new("greetings")
//!     .with_global("greeting", Value::from("hello"))
//!     .with_function(
//!         "greet",
//!         "Greets.\n\n```\n>>> greet()\nhello\n```\n",
//!         |ctx, _args| {
//!             let greeting = ctx.global("greeting")?.clone();
//!             ctx.print(&greeting);
//!             Ok(Value::None)
//!         },
//!     );
//!
//! let finder = ExampleFinder::new(&PromptParser, &NativeNamespace);
//! let examples: Vec<_> = finder.find(&module).collect::<Result<_, _>>().unwrap();
//! assert_eq!(examples.len(), 1);
//!
//! let report = examples.into_iter().next().unwrap().run(&Interpreter::new());
//! assert!(report.passed());
//! ```

mod bound;
mod catalog;
mod error;
mod example;
mod executor;
mod finder;

pub use bound::{BoundExample, ExampleId, ExampleReport, StepFailure};
pub use catalog::{Catalog, DocumentedItem, Module, ModuleCatalog};
pub use error::{CollectionError, ExecutionError};
pub use example::{Example, ExampleParser, PromptParser, Step};
pub use executor::{ExampleExecutor, Interpreter};
pub use finder::{ExampleFinder, NamespaceResolver, NativeNamespace};
