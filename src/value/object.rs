//! Objects with readable and writable attributes.

use super::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The capability set a value must offer to have attributes substituted.
///
/// Implementations own their attribute state. [`HostObject::clone_object`]
/// must return a copy whose attribute writes are not visible through the
/// original; attribute values themselves are shared handles, so the copy is
/// shallow.
///
/// # Object Safety
///
/// This trait is object-safe and is used as `dyn HostObject`.
///
/// # Example
///
/// ```
/// use mockable_doctests::value::{HostObject, Object, Value};
///
/// #[derive(Debug, Clone)]
/// struct Thermostat {
///     target: i64,
/// }
///
/// impl HostObject for Thermostat {
///     fn type_name(&self) -> &str {
///         "Thermostat"
///     }
///
///     fn get_attr(&self, name: &str) -> Option<Value> {
///         (name == "target").then(|| Value::Int(self.target))
///     }
///
///     fn set_attr(&mut self, name: &str, value: Value) -> Result<(), String> {
///         match (name, value) {
///             ("target", Value::Int(n)) => {
///                 self.target = n;
///                 Ok(())
///             }
///             _ => Err(format!("cannot set {}", name)),
///         }
///     }
///
///     fn attr_names(&self) -> Vec<String> {
///         vec!["target".to_string()]
///     }
///
///     fn clone_object(&self) -> Box<dyn HostObject> {
///         Box::new(self.clone())
///     }
/// }
///
/// let original = Object::new(Thermostat { target: 20 });
/// let copy = original.with_attr("target", Value::Int(25)).unwrap();
///
/// assert_eq!(original.get_attr("target"), Some(Value::Int(20)));
/// assert_eq!(copy.get_attr("target"), Some(Value::Int(25)));
/// ```
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Name of the object's type.
    fn type_name(&self) -> &str;

    /// Read an attribute. Returns `None` if the object has no such attribute.
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// Write an attribute, overwriting or introducing it.
    ///
    /// Returns a message describing the refusal if the object does not
    /// accept the attribute or value.
    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), String>;

    /// Names of all readable attributes.
    fn attr_names(&self) -> Vec<String>;

    /// Produce an independent shallow copy of this object.
    fn clone_object(&self) -> Box<dyn HostObject>;
}

/// A shared, copy-on-write handle to a [`HostObject`].
///
/// Cloning an `Object` is cheap and shares the underlying state. Writing
/// an attribute through a handle that is shared first copies the object via
/// [`HostObject::clone_object`], so other handles keep seeing the old state.
#[derive(Clone)]
pub struct Object {
    inner: Arc<dyn HostObject>,
}

impl Object {
    /// Wrap a host object in a new handle.
    pub fn new(object: impl HostObject + 'static) -> Self {
        Self {
            inner: Arc::new(object),
        }
    }

    /// Wrap an already boxed host object.
    pub fn from_boxed(object: Box<dyn HostObject>) -> Self {
        Self {
            inner: Arc::from(object),
        }
    }

    /// Name of the object's type.
    pub fn type_name(&self) -> &str {
        self.inner.type_name()
    }

    /// Read an attribute.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.inner.get_attr(name)
    }

    /// Check if the object exposes an attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.inner.get_attr(name).is_some()
    }

    /// Names of all readable attributes.
    pub fn attr_names(&self) -> Vec<String> {
        self.inner.attr_names()
    }

    /// Write an attribute through this handle.
    ///
    /// If the state is shared with other handles it is copied first, so
    /// the write is only visible through this handle and its future clones.
    pub fn set_attr(&mut self, name: &str, value: Value) -> Result<(), String> {
        if let Some(exclusive) = Arc::get_mut(&mut self.inner) {
            return exclusive.set_attr(name, value);
        }
        let mut copy = self.inner.clone_object();
        copy.set_attr(name, value)?;
        self.inner = Arc::from(copy);
        Ok(())
    }

    /// Produce a shallow copy with one attribute replaced, leaving this
    /// handle untouched.
    pub fn with_attr(&self, name: &str, value: Value) -> Result<Object, String> {
        let mut copy = self.inner.clone_object();
        copy.set_attr(name, value)?;
        Ok(Object::from_boxed(copy))
    }

    /// Produce an independent shallow copy.
    pub fn shallow_copy(&self) -> Object {
        Object::from_boxed(self.inner.clone_object())
    }

    /// Check whether two handles share the same underlying state.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// Handles are equal when they share state, or when type name and every
/// attribute compare equal.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.type_name() != other.type_name() {
            return false;
        }
        let mut names = self.attr_names();
        let mut other_names = other.attr_names();
        names.sort();
        other_names.sort();
        names == other_names
            && names
                .iter()
                .all(|name| self.get_attr(name) == other.get_attr(name))
    }
}

/// A plain attribute bag: a type name and an ordered attribute table.
///
/// # Example
///
/// ```
/// use mockable_doctests::value::{Record, HostObject, Value};
///
/// let record = Record::new("Point").with("x", 1).with("y", 2);
/// assert_eq!(record.get_attr("x"), Some(Value::Int(1)));
/// assert_eq!(record.attr_names(), vec!["x", "y"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    type_name: String,
    attrs: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Add an attribute using builder pattern.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Insert an attribute, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attrs.insert(name.into(), value.into())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl HostObject for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }

    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), String> {
        self.attrs.insert(name.to_string(), value);
        Ok(())
    }

    fn attr_names(&self) -> Vec<String> {
        self.attrs.keys().cloned().collect()
    }

    fn clone_object(&self) -> Box<dyn HostObject> {
        Box::new(self.clone())
    }
}
