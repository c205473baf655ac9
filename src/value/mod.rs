//! Dynamic values bound in an execution namespace.
//!
//! A [`Value`] is what a documented example sees when it names something:
//! a primitive, a list, an [`Object`] exposing attributes, or a
//! [`Callable`] native function. Values are cheap to clone; objects and
//! callables are shared handles, and writes through an object handle are
//! copy-on-write so clones never observe each other's mutations.
//!
//! # Example
//!
//! ```
//! use mockable_doctests::value::{Object, Record, Value};
//!
//! let gateway = Object::new(Record::new("Gateway").with("retries", 3));
//! let value = Value::Object(gateway);
//!
//! assert_eq!(value.type_name(), "Gateway");
//! assert_eq!(value.to_string(), "<Gateway object>");
//! assert_eq!(Value::from("hi").to_string(), "'hi'");
//! ```

mod callable;
mod object;

pub use callable::{CallContext, Callable, NativeFn};
pub use object::{HostObject, Object, Record};

use std::fmt;

/// A dynamically typed value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absence of a value. Expression statements evaluating to `None`
    /// produce no output.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An object exposing readable and writable attributes.
    Object(Object),
    /// A native function.
    Callable(Callable),
}

impl Value {
    /// Name of the value's type, as shown in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Object(object) => object.type_name(),
            Value::Callable(_) => "function",
        }
    }

    /// Check if this is `Value::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get the object handle, if this value is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Get the callable, if this value is a callable.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Get the integer, if this value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string slice, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way `print` shows it: strings without quotes,
    /// everything else as its repr.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Formats the repr of the value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "<{} object>", object.type_name()),
            Value::Callable(callable) => write!(f, "<function {}>", callable.name()),
        }
    }
}

/// Structural equality for data, identity-or-attribute equality for
/// objects, identity for callables.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(Object::new(record))
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("it's").to_string(), "'it\\'s'");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("a")]).to_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_display_string_strips_quotes() {
        assert_eq!(Value::from("plain").to_display_string(), "plain");
        assert_eq!(Value::Int(7).to_display_string(), "7");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::None.type_name(), "NoneType");
        assert_eq!(Value::from(Record::new("Clock")).type_name(), "Clock");
        let f = Callable::new("f", |_, _| Ok(Value::None));
        assert_eq!(Value::from(f).type_name(), "function");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::from("2"));

        let f = Callable::new("f", |_, _| Ok(Value::None));
        let g = Callable::new("f", |_, _| Ok(Value::None));
        assert_eq!(Value::from(f.clone()), Value::from(f));
        assert_ne!(
            Value::from(g),
            Value::from(Callable::new("f", |_, _| Ok(Value::None)))
        );
    }

    #[test]
    fn test_value_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }
}
