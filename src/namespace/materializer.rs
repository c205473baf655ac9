//! Building isolated execution namespaces from substitutions.

use super::{Namespace, PathError, SubstitutionMap};
use thiserror::Error;
use tracing::debug;

/// Options controlling how substitutions are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Maximum number of attribute levels below the root a key may reach.
    ///
    /// `None` allows any depth. `Some(1)` accepts `object.attribute` but
    /// rejects `object.inner.attribute` with [`MaterializeError::PathTooDeep`].
    pub max_path_depth: Option<usize>,
}

impl MaterializeOptions {
    /// Options limiting keys to `max_depth` attribute levels.
    pub fn with_max_path_depth(max_depth: usize) -> Self {
        Self {
            max_path_depth: Some(max_depth),
        }
    }
}

/// Errors raised while applying a substitution map.
///
/// Every variant names the offending substitution key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    /// The key is not a dot-separated sequence of identifiers.
    #[error("invalid substitution key '{key}'")]
    InvalidKey {
        /// The malformed key.
        key: String,
    },

    /// The root name of a dotted key is not bound in the namespace.
    #[error("cannot substitute '{key}': root name '{root}' is not defined")]
    MissingRoot {
        /// The offending key.
        key: String,
        /// The missing root name.
        root: String,
    },

    /// The key nests deeper than the configured maximum.
    #[error("cannot substitute '{key}': path depth {depth} exceeds the supported maximum of {max}")]
    PathTooDeep {
        /// The offending key.
        key: String,
        /// Attribute levels in the key.
        depth: usize,
        /// The configured maximum.
        max: usize,
    },

    /// An intermediate attribute on the path does not exist.
    #[error("cannot substitute '{key}': '{parent}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// The offending key.
        key: String,
        /// Path of the object lacking the attribute.
        parent: String,
        /// The missing attribute.
        attribute: String,
    },

    /// A value on the path cannot hold attributes.
    #[error("cannot substitute '{key}': '{path}' is a {type_name}, not an object")]
    NotAnObject {
        /// The offending key.
        key: String,
        /// Path of the non-object value.
        path: String,
        /// Its type name.
        type_name: String,
    },

    /// The object refused the attribute write.
    #[error("cannot substitute '{key}': {message}")]
    AttributeRejected {
        /// The offending key.
        key: String,
        /// The object's reason.
        message: String,
    },
}

impl MaterializeError {
    /// The substitution key that caused the error.
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidKey { key }
            | Self::MissingRoot { key, .. }
            | Self::PathTooDeep { key, .. }
            | Self::MissingAttribute { key, .. }
            | Self::NotAnObject { key, .. }
            | Self::AttributeRejected { key, .. } => key,
        }
    }

    /// Attach a key to a path failure.
    fn at(key: &str, error: PathError) -> Self {
        let key = key.to_string();
        match error {
            PathError::Empty => Self::InvalidKey { key },
            PathError::MissingRoot { root } => Self::MissingRoot { key, root },
            PathError::MissingAttribute { parent, attribute } => Self::MissingAttribute {
                key,
                parent,
                attribute,
            },
            PathError::NotAnObject { path, type_name } => Self::NotAnObject {
                key,
                path,
                type_name,
            },
            rejected @ PathError::Rejected { .. } => Self::AttributeRejected {
                key,
                message: rejected.to_string(),
            },
        }
    }
}

/// Derive an isolated namespace from `base` with `substitutions` applied.
///
/// `base` is cloned, never modified. Keys apply in [`SubstitutionKey`]
/// order (top-level names first, then deeper paths, ties broken by key
/// text), so `{"foo": x, "foo.bar": y}` rebinds `foo` to `x` and then sets
/// `bar` on a copy of `x`. Objects on a dotted path are copied before being
/// written, so the originals stay intact wherever else they are bound.
///
/// An empty map still yields a fresh copy.
///
/// [`SubstitutionKey`]: super::SubstitutionKey
pub fn materialize(
    base: &Namespace,
    substitutions: &SubstitutionMap,
    options: &MaterializeOptions,
) -> Result<Namespace, MaterializeError> {
    let ordered = substitutions
        .ordered()
        .map_err(|key| MaterializeError::InvalidKey { key })?;

    let mut namespace = base.clone();
    for (key, value) in ordered {
        if let Some(max) = options.max_path_depth {
            if key.depth() > max {
                return Err(MaterializeError::PathTooDeep {
                    key: key.to_string(),
                    depth: key.depth(),
                    max,
                });
            }
        }

        debug!(key = %key, value = %value, "applying substitution");
        namespace
            .set_path(key.segments(), value.clone())
            .map_err(|e| MaterializeError::at(key.as_str(), e))?;
    }

    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Callable, HostObject, Object, Record, Value};

    fn base() -> Namespace {
        Namespace::new()
            .with("foo", 1)
            .with("object", Record::new("Thing").with("attribute", 5))
    }

    #[test]
    fn test_top_level_substitution() {
        let base = base();
        let ns = materialize(
            &base,
            &SubstitutionMap::new().with("foo", 10),
            &MaterializeOptions::default(),
        )
        .unwrap();

        assert_eq!(ns.get("foo"), Some(&Value::Int(10)));
        assert_eq!(base.get("foo"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_new_name_is_introduced() {
        let ns = materialize(
            &base(),
            &SubstitutionMap::new().with("clock", Callable::returning("clock", Value::Int(0))),
            &MaterializeOptions::default(),
        )
        .unwrap();

        assert!(ns.get("clock").unwrap().as_callable().is_some());
    }

    #[test]
    fn test_attribute_substitution_leaves_original_object() {
        let base = base();
        let original = base.get("object").unwrap().as_object().unwrap().clone();

        let ns = materialize(
            &base,
            &SubstitutionMap::new().with("object.attribute", 20),
            &MaterializeOptions::default(),
        )
        .unwrap();

        assert_eq!(ns.resolve("object.attribute"), Some(Value::Int(20)));
        assert_eq!(original.get_attr("attribute"), Some(Value::Int(5)));
        assert_eq!(base.resolve("object.attribute"), Some(Value::Int(5)));
        assert!(!ns.get("object").unwrap().as_object().unwrap().ptr_eq(&original));
    }

    #[test]
    fn test_empty_map_is_passthrough_copy() {
        let base = base();
        let ns = materialize(&base, &SubstitutionMap::new(), &MaterializeOptions::default())
            .unwrap();

        assert_eq!(ns, base);
        for name in base.names() {
            assert_eq!(ns.get(name), base.get(name));
        }
    }

    #[test]
    fn test_missing_root() {
        let err = materialize(
            &base(),
            &SubstitutionMap::new().with("undeclared.attribute", 1),
            &MaterializeOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            MaterializeError::MissingRoot {
                key: "undeclared.attribute".to_string(),
                root: "undeclared".to_string(),
            }
        );
        assert_eq!(err.key(), "undeclared.attribute");
        assert!(err.to_string().contains("undeclared.attribute"));
    }

    #[test]
    fn test_invalid_key() {
        let err = materialize(
            &base(),
            &SubstitutionMap::new().with("object.", 1),
            &MaterializeOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            MaterializeError::InvalidKey {
                key: "object.".to_string()
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let base = Namespace::new().with(
            "outer",
            Record::new("Outer").with("inner", Record::new("Inner").with("x", 1)),
        );
        let substitutions = SubstitutionMap::new().with("outer.inner.x", 2);

        let err = materialize(
            &base,
            &substitutions,
            &MaterializeOptions::with_max_path_depth(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::PathTooDeep { depth: 2, max: 1, .. }
        ));

        let ns = materialize(&base, &substitutions, &MaterializeOptions::default()).unwrap();
        assert_eq!(ns.resolve("outer.inner.x"), Some(Value::Int(2)));
        assert_eq!(base.resolve("outer.inner.x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_top_level_applies_before_dotted() {
        let replacement = Record::new("Replacement").with("foo", 0);
        let substitutions = SubstitutionMap::new()
            .with("object.foo", 7)
            .with("object", replacement);

        let ns = materialize(&base(), &substitutions, &MaterializeOptions::default()).unwrap();

        assert_eq!(ns.get("object").unwrap().type_name(), "Replacement");
        assert_eq!(ns.resolve("object.foo"), Some(Value::Int(7)));
    }

    #[test]
    fn test_not_an_object() {
        let err = materialize(
            &base(),
            &SubstitutionMap::new().with("foo.bar", 1),
            &MaterializeOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, MaterializeError::NotAnObject { ref path, .. } if path == "foo"));
    }

    #[test]
    fn test_rejected_attribute() {
        #[derive(Debug, Clone)]
        struct Sealed;

        impl HostObject for Sealed {
            fn type_name(&self) -> &str {
                "Sealed"
            }
            fn get_attr(&self, _name: &str) -> Option<Value> {
                None
            }
            fn set_attr(&mut self, _name: &str, _value: Value) -> Result<(), String> {
                Err("object is sealed".to_string())
            }
            fn attr_names(&self) -> Vec<String> {
                Vec::new()
            }
            fn clone_object(&self) -> Box<dyn HostObject> {
                Box::new(self.clone())
            }
        }

        let base = Namespace::new().with("sealed", Object::new(Sealed));
        let err = materialize(
            &base,
            &SubstitutionMap::new().with("sealed.x", 1),
            &MaterializeOptions::default(),
        )
        .unwrap_err();

        assert_eq!(err.key(), "sealed.x");
        assert!(err.to_string().contains("object is sealed"));
    }

    #[test]
    fn test_two_materializations_are_independent() {
        let base = base();
        let substitutions = SubstitutionMap::new().with("object.attribute", 20);
        let options = MaterializeOptions::default();

        let mut first = materialize(&base, &substitutions, &options).unwrap();
        let second = materialize(&base, &substitutions, &options).unwrap();

        first
            .set_path(&["object", "attribute"], Value::Int(99))
            .unwrap();
        first.insert("foo", Value::Int(99));

        assert_eq!(second.resolve("object.attribute"), Some(Value::Int(20)));
        assert_eq!(second.get("foo"), Some(&Value::Int(1)));
        assert_eq!(base.resolve("object.attribute"), Some(Value::Int(5)));
    }

    #[test]
    fn test_different_maps_from_one_base_are_isolated() {
        let base = base();
        let options = MaterializeOptions::default();

        let mut attribute = materialize(
            &base,
            &SubstitutionMap::new().with("object.attribute", 20),
            &options,
        )
        .unwrap();
        let top_level =
            materialize(&base, &SubstitutionMap::new().with("foo", 10), &options).unwrap();

        attribute
            .set_path(&["object", "attribute"], Value::Int(99))
            .unwrap();
        attribute.insert("foo", Value::Int(99));

        assert_eq!(top_level.resolve("object.attribute"), Some(Value::Int(5)));
        assert_eq!(top_level.get("foo"), Some(&Value::Int(10)));
        assert_eq!(base.resolve("object.attribute"), Some(Value::Int(5)));
        assert_eq!(base.get("foo"), Some(&Value::Int(1)));
    }
}
