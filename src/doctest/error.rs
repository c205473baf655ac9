//! Error types for example collection and execution.

use crate::namespace::{MaterializeError, PathError};
use thiserror::Error;

/// Errors raised while executing one example statement.
///
/// The runner reports these as the statement's output (`Error: ...`), so an
/// example can document an expected failure.
///
/// # Example
///
/// ```
/// use mockable_doctests::doctest::ExecutionError;
///
/// let error = ExecutionError::undefined_name("clock");
/// assert_eq!(error.to_string(), "name 'clock' is not defined");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The statement could not be parsed.
    #[error("syntax error: {message}")]
    Syntax {
        /// Description of the problem.
        message: String,
    },

    /// A free name is not bound in the namespace.
    #[error("name '{name}' is not defined")]
    UndefinedName {
        /// The unbound name.
        name: String,
    },

    /// An attribute lookup failed.
    #[error("'{owner}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// Type or path of the object looked into.
        owner: String,
        /// The missing attribute.
        attribute: String,
    },

    /// A value that is not a function was called.
    #[error("'{type_name}' object is not callable")]
    NotCallable {
        /// Type of the called value.
        type_name: String,
    },

    /// An attribute was read from or written to a value that is not an
    /// object.
    #[error("'{path}' is a {type_name}, not an object")]
    NotAnObject {
        /// Path of the offending value.
        path: String,
        /// Its type name.
        type_name: String,
    },

    /// A native function returned an error.
    #[error("{function}() failed: {message}")]
    CallFailed {
        /// Name of the failing function.
        function: String,
        /// The function's message.
        message: String,
    },

    /// Integer arithmetic left the `i64` range.
    #[error("integer overflow in {operation}")]
    Overflow {
        /// The operation that overflowed.
        operation: String,
    },

    /// An object refused an attribute assignment.
    #[error("{message}")]
    AttributeRejected {
        /// The object's reason.
        message: String,
    },
}

impl ExecutionError {
    /// Create a Syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Create an UndefinedName error.
    pub fn undefined_name(name: impl Into<String>) -> Self {
        Self::UndefinedName { name: name.into() }
    }

    /// Create a CallFailed error.
    pub fn call_failed(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            function: function.into(),
            message: message.into(),
        }
    }
}

impl From<PathError> for ExecutionError {
    fn from(error: PathError) -> Self {
        match error {
            PathError::Empty => Self::syntax("empty assignment target"),
            PathError::MissingRoot { root } => Self::UndefinedName { name: root },
            PathError::MissingAttribute { parent, attribute } => Self::MissingAttribute {
                owner: parent,
                attribute,
            },
            PathError::NotAnObject { path, type_name } => Self::NotAnObject { path, type_name },
            rejected @ PathError::Rejected { .. } => Self::AttributeRejected {
                message: rejected.to_string(),
            },
        }
    }
}

/// Errors raised while turning documented items into tests.
///
/// A collection error belongs to one test: discovery records it and moves
/// on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The substitutions for an example could not be applied.
    #[error("cannot collect {module}.{function}: {source}")]
    Materialize {
        /// Module of the documented function.
        module: String,
        /// The documented function.
        function: String,
        /// Position of the example, when the failure is per example.
        position: Option<usize>,
        /// The underlying failure.
        #[source]
        source: MaterializeError,
    },

    /// Mocks are declared for a module the catalog does not know.
    #[error("mocks declared for unknown module '{module}'")]
    UnknownModule {
        /// The unknown module.
        module: String,
    },

    /// Mocks are declared for a function the module does not document.
    #[error("mocks declared for '{module}.{function}', which has no documented item")]
    UnknownFunction {
        /// The module searched.
        module: String,
        /// The unknown function.
        function: String,
    },
}

impl CollectionError {
    /// Create a Materialize error.
    pub fn materialize(
        module: impl Into<String>,
        function: impl Into<String>,
        position: Option<usize>,
        source: MaterializeError,
    ) -> Self {
        Self::Materialize {
            module: module.into(),
            function: function.into(),
            position,
            source,
        }
    }

    /// The module the error concerns.
    pub fn module(&self) -> &str {
        match self {
            Self::Materialize { module, .. }
            | Self::UnknownModule { module }
            | Self::UnknownFunction { module, .. } => module,
        }
    }

    /// The function the error concerns, if any.
    pub fn function(&self) -> Option<&str> {
        match self {
            Self::Materialize { function, .. } | Self::UnknownFunction { function, .. } => {
                Some(function)
            }
            Self::UnknownModule { .. } => None,
        }
    }

    /// The example position the error concerns, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Materialize { position, .. } => *position,
            _ => None,
        }
    }

    /// The substitution key that failed, for materialization errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Materialize { source, .. } => Some(source.key()),
            _ => None,
        }
    }

    /// Identifier of the test this error stands in for.
    pub fn test_id(&self) -> String {
        match (self.function(), self.position()) {
            (Some(function), Some(position)) => {
                format!("{}.{}[{}]", self.module(), function, position)
            }
            (Some(function), None) => format!("{}.{}", self.module(), function),
            (None, _) => self.module().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_display() {
        assert_eq!(
            ExecutionError::syntax("unexpected ')'").to_string(),
            "syntax error: unexpected ')'"
        );
        assert_eq!(
            ExecutionError::call_failed("now", "clock stopped").to_string(),
            "now() failed: clock stopped"
        );
        assert_eq!(
            ExecutionError::NotCallable {
                type_name: "int".to_string()
            }
            .to_string(),
            "'int' object is not callable"
        );
    }

    #[test]
    fn test_from_path_error() {
        let error: ExecutionError = PathError::MissingRoot {
            root: "config".to_string(),
        }
        .into();
        assert_eq!(error, ExecutionError::undefined_name("config"));

        let error: ExecutionError = PathError::Rejected {
            parent: "frozen".to_string(),
            attribute: "x".to_string(),
            message: "read-only".to_string(),
        }
        .into();
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn test_collection_error_accessors() {
        let error = CollectionError::materialize(
            "shop",
            "checkout",
            Some(2),
            MaterializeError::MissingRoot {
                key: "gateway.url".to_string(),
                root: "gateway".to_string(),
            },
        );

        assert_eq!(error.module(), "shop");
        assert_eq!(error.function(), Some("checkout"));
        assert_eq!(error.key(), Some("gateway.url"));
        assert_eq!(error.test_id(), "shop.checkout[2]");
        assert!(error.to_string().contains("gateway.url"));
    }

    #[test]
    fn test_unknown_errors() {
        let module = CollectionError::UnknownModule {
            module: "ghost".to_string(),
        };
        assert_eq!(module.test_id(), "ghost");
        assert_eq!(module.function(), None);
        assert_eq!(module.key(), None);

        let function = CollectionError::UnknownFunction {
            module: "shop".to_string(),
            function: "refund".to_string(),
        };
        assert_eq!(function.test_id(), "shop.refund");
        assert!(function.to_string().contains("shop.refund"));
    }
}
