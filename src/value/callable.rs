//! Native functions callable from documented examples.

use super::Value;
use crate::namespace::Namespace;
use std::fmt;
use std::sync::Arc;

/// Signature of a native function body.
///
/// The function receives the calling context (the namespace it runs
/// against and the example's output buffer) and its positional arguments.
/// An `Err` carries the failure message reported for the call.
pub type NativeFn = dyn Fn(&mut CallContext<'_>, &[Value]) -> Result<Value, String> + Send + Sync;

/// Context handed to a [`Callable`] while it runs.
///
/// `globals()` is the namespace of the executing example, so a documented
/// function that looks up its collaborators here sees the substituted
/// bindings when its example was mocked.
pub struct CallContext<'a> {
    globals: &'a Namespace,
    output: &'a mut String,
}

impl<'a> CallContext<'a> {
    /// Create a context over a namespace and an output buffer.
    pub fn new(globals: &'a Namespace, output: &'a mut String) -> Self {
        Self { globals, output }
    }

    /// The namespace the call runs against.
    pub fn globals(&self) -> &Namespace {
        self.globals
    }

    /// Look up a global binding.
    pub fn global(&self, name: &str) -> Result<&Value, String> {
        self.globals
            .get(name)
            .ok_or_else(|| format!("name '{}' is not defined", name))
    }

    /// Print a line to the example's output, the way `print` would.
    pub fn print(&mut self, value: &Value) {
        self.output.push_str(&value.to_display_string());
        self.output.push('\n');
    }

    /// Print a raw text line to the example's output.
    pub fn print_str(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Call the global function bound to `name` with this context.
    pub fn call_global(&mut self, name: &str, args: &[Value]) -> Result<Value, String> {
        let callable = match self.global(name)? {
            Value::Callable(callable) => callable.clone(),
            other => return Err(format!("'{}' object is not callable", other.type_name())),
        };
        callable.call(self, args)
    }
}

/// A named native function.
///
/// # Example
///
/// ```
/// use mockable_doctests::namespace::Namespace;
/// use mockable_doctests::value::{CallContext, Callable, Value};
///
/// let double = Callable::new("double", |_ctx, args| match args {
///     [Value::Int(n)] => Ok(Value::Int(n * 2)),
///     _ => Err("double() takes one integer".to_string()),
/// });
///
/// let globals = Namespace::new();
/// let mut output = String::new();
/// let mut ctx = CallContext::new(&globals, &mut output);
/// assert_eq!(double.call(&mut ctx, &[Value::Int(21)]), Ok(Value::Int(42)));
/// ```
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Arc<NativeFn>,
}

impl Callable {
    /// Create a callable from a closure.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut CallContext<'_>, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Create a callable that ignores its arguments and returns a fixed value.
    pub fn returning(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, move |_, _| Ok(value.clone()))
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function.
    pub fn call(&self, ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value, String> {
        (self.func)(ctx, args)
    }

    /// Check whether two callables share the same function body.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish()
    }
}
