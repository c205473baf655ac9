//! Execution namespaces and their materialization.
//!
//! A [`Namespace`] is the set of name-to-value bindings a documented example
//! runs against. [`materialize`] derives an isolated namespace from a
//! module's native globals by applying a [`SubstitutionMap`]:
//!
//! ```text
//! base namespace ──clone──▶ new namespace
//!                              │
//!        "foo"          ──────▶│ rebind top-level name
//!        "object.attr"  ──────▶│ copy `object`, set `attr` on the copy,
//!                              │ rebind `object` to the copy
//!                              ▼
//!                      isolated namespace (base untouched)
//! ```
//!
//! # Example
//!
//! ```
//! use mockable_doctests::namespace::{materialize, MaterializeOptions, Namespace, SubstitutionMap};
//! use mockable_doctests::value::{Record, Value};
//!
//! let mut base = Namespace::new();
//! base.insert("foo", Value::Int(1));
//! base.insert("object", Record::new("Thing").with("attribute", 5).into());
//!
//! let substitutions = SubstitutionMap::new()
//!     .with("foo", 10)
//!     .with("object.attribute", 20);
//!
//! let mocked = materialize(&base, &substitutions, &MaterializeOptions::default()).unwrap();
//!
//! assert_eq!(mocked.get("foo"), Some(&Value::Int(10)));
//! assert_eq!(mocked.resolve("object.attribute"), Some(Value::Int(20)));
//! assert_eq!(base.get("foo"), Some(&Value::Int(1)));
//! assert_eq!(base.resolve("object.attribute"), Some(Value::Int(5)));
//! ```

mod materializer;
mod substitution;

pub use materializer::{materialize, MaterializeError, MaterializeOptions};
pub use substitution::{SubstitutionKey, SubstitutionMap, PATH_SEPARATOR};

use crate::value::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure to write a value at an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments.
    #[error("empty path")]
    Empty,

    /// The first segment is not bound in the namespace.
    #[error("name '{root}' is not defined")]
    MissingRoot {
        /// The missing top-level name.
        root: String,
    },

    /// An intermediate attribute does not exist.
    #[error("'{parent}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// Path of the object that lacks the attribute.
        parent: String,
        /// The missing attribute.
        attribute: String,
    },

    /// A value on the path is not an object and cannot hold attributes.
    #[error("'{path}' is a {type_name}, not an object")]
    NotAnObject {
        /// Path of the offending value.
        path: String,
        /// Its type name.
        type_name: String,
    },

    /// The object refused the attribute write.
    #[error("cannot set '{attribute}' on '{parent}': {message}")]
    Rejected {
        /// Path of the object that refused the write.
        parent: String,
        /// The attribute being written.
        attribute: String,
        /// The object's reason.
        message: String,
    },
}

/// An ordered mapping from name to [`Value`].
///
/// Cloning a namespace is a shallow copy: values are handles, and objects
/// are copy-on-write, so a clone never observes writes made through
/// another namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    bindings: BTreeMap<String, Value>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding using builder pattern.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Bind a name, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    /// Look up a top-level name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Remove a binding, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Check if a top-level name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of top-level bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the namespace has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bound names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.bindings.keys().map(|s| s.as_str()).collect()
    }

    /// Iterate over all bindings, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }

    /// Resolve a dotted path such as `object.attribute`.
    ///
    /// Returns `None` if any segment is missing or a non-object is
    /// traversed.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let mut current = self.get(segments.next()?)?.clone();
        for segment in segments {
            current = current.as_object()?.get_attr(segment)?;
        }
        Some(current)
    }

    /// Write `value` at the attribute path `segments`.
    ///
    /// A single segment binds a top-level name. Longer paths require the
    /// root name and every intermediate attribute to exist; each object on
    /// the path is written copy-on-write, so objects shared with other
    /// namespaces are never modified.
    pub fn set_path<S: AsRef<str>>(&mut self, segments: &[S], value: Value) -> Result<(), PathError> {
        let (root, attributes) = segments.split_first().ok_or(PathError::Empty)?;
        let root = root.as_ref();
        if attributes.is_empty() {
            self.bindings.insert(root.to_string(), value);
            return Ok(());
        }

        let slot = self
            .bindings
            .get_mut(root)
            .ok_or_else(|| PathError::MissingRoot {
                root: root.to_string(),
            })?;
        assign_attribute(slot, root.to_string(), attributes, value)
    }
}

/// Recursively assign through the object chain rooted at `slot`.
fn assign_attribute<S: AsRef<str>>(
    slot: &mut Value,
    parent: String,
    attributes: &[S],
    value: Value,
) -> Result<(), PathError> {
    let object = match slot {
        Value::Object(object) => object,
        other => {
            return Err(PathError::NotAnObject {
                path: parent,
                type_name: other.type_name().to_string(),
            })
        }
    };
    let Some((attribute, rest)) = attributes.split_first() else {
        return Err(PathError::Empty);
    };
    let attribute = attribute.as_ref();

    let new_value = if rest.is_empty() {
        value
    } else {
        let mut child = object
            .get_attr(attribute)
            .ok_or_else(|| PathError::MissingAttribute {
                parent: parent.clone(),
                attribute: attribute.to_string(),
            })?;
        let child_path = format!("{}{}{}", parent, PATH_SEPARATOR, attribute);
        assign_attribute(&mut child, child_path, rest, value)?;
        child
    };

    object
        .set_attr(attribute, new_value)
        .map_err(|message| PathError::Rejected {
            parent,
            attribute: attribute.to_string(),
            message,
        })
}

impl FromIterator<(String, Value)> for Namespace {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Record};

    fn sample() -> Namespace {
        let inner = Record::new("Inner").with("depth", 2);
        Namespace::new()
            .with("foo", 1)
            .with("object", Record::new("Outer").with("attribute", 5).with("inner", inner))
    }

    #[test]
    fn test_resolve() {
        let ns = sample();
        assert_eq!(ns.resolve("foo"), Some(Value::Int(1)));
        assert_eq!(ns.resolve("object.attribute"), Some(Value::Int(5)));
        assert_eq!(ns.resolve("object.inner.depth"), Some(Value::Int(2)));
        assert_eq!(ns.resolve("object.missing"), None);
        assert_eq!(ns.resolve("foo.bar"), None);
        assert_eq!(ns.resolve("nothing"), None);
    }

    #[test]
    fn test_set_path_top_level() {
        let mut ns = sample();
        ns.set_path(&["foo"], Value::Int(3)).unwrap();
        ns.set_path(&["fresh"], Value::Bool(true)).unwrap();

        assert_eq!(ns.get("foo"), Some(&Value::Int(3)));
        assert_eq!(ns.get("fresh"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_set_path_copies_shared_objects() {
        let base = sample();
        let mut copy = base.clone();

        copy.set_path(&["object", "inner", "depth"], Value::Int(7)).unwrap();

        assert_eq!(copy.resolve("object.inner.depth"), Some(Value::Int(7)));
        assert_eq!(base.resolve("object.inner.depth"), Some(Value::Int(2)));
        assert_eq!(copy.resolve("object.attribute"), Some(Value::Int(5)));
    }

    #[test]
    fn test_set_path_errors() {
        let mut ns = sample();

        assert_eq!(
            ns.set_path(&["undeclared", "attribute"], Value::Int(1)),
            Err(PathError::MissingRoot {
                root: "undeclared".to_string()
            })
        );
        assert_eq!(
            ns.set_path(&["foo", "bar"], Value::Int(1)),
            Err(PathError::NotAnObject {
                path: "foo".to_string(),
                type_name: "int".to_string()
            })
        );
        assert_eq!(
            ns.set_path(&["object", "missing", "x"], Value::Int(1)),
            Err(PathError::MissingAttribute {
                parent: "object".to_string(),
                attribute: "missing".to_string()
            })
        );
        let empty: [&str; 0] = [];
        assert_eq!(ns.set_path(&empty, Value::None), Err(PathError::Empty));
    }

    #[test]
    fn test_clone_is_isolated() {
        let base = sample();
        let mut a = base.clone();
        let b = base.clone();

        a.insert("foo", Value::Int(100));
        a.set_path(&["object", "attribute"], Value::Int(100)).unwrap();

        assert_eq!(b, base);
        assert_eq!(b.resolve("object.attribute"), Some(Value::Int(5)));
    }

    #[test]
    fn test_names_are_ordered() {
        let ns = Namespace::new().with("b", 1).with("a", 2).with("c", 3);
        assert_eq!(ns.names(), vec!["a", "b", "c"]);
        assert_eq!(ns.len(), 3);
        assert!(ns.contains("a"));
    }

    #[test]
    fn test_from_iter() {
        let ns: Namespace = vec![
            ("x".to_string(), Value::Int(1)),
            ("obj".to_string(), Value::Object(Object::new(Record::new("T")))),
        ]
        .into_iter()
        .collect();
        assert_eq!(ns.len(), 2);
    }
}
