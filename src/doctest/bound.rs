//! Examples bound to the namespace they execute against.

use super::{Example, ExampleExecutor};
use crate::namespace::Namespace;
use std::fmt;
use tracing::debug;

/// Identity of one example: its module, documented function, and position.
///
/// Ordering is by module, then function, then position, which is the order
/// discovery reports tests in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExampleId {
    module: String,
    function: String,
    position: usize,
}

impl ExampleId {
    /// Create an identifier.
    pub fn new(module: impl Into<String>, function: impl Into<String>, position: usize) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            position,
        }
    }

    /// The module name.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The documented function's name.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The example's position within the function's documentation.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.module, self.function, self.position)
    }
}

/// An example together with the namespace it executes against.
///
/// The namespace is owned: no other example, and not the module itself,
/// can observe it. Each [`run`](Self::run) starts from a fresh copy, so
/// assignments made by one run never leak into the next.
#[derive(Debug, Clone)]
pub struct BoundExample {
    id: ExampleId,
    example: Example,
    namespace: Namespace,
    mocked: bool,
}

impl BoundExample {
    /// Bind `example` to `namespace`.
    ///
    /// `mocked` records whether substitutions were applied to build the
    /// namespace.
    pub fn new(id: ExampleId, example: Example, namespace: Namespace, mocked: bool) -> Self {
        Self {
            id,
            example,
            namespace,
            mocked,
        }
    }

    /// The example's identity.
    pub fn id(&self) -> &ExampleId {
        &self.id
    }

    /// The parsed example.
    pub fn example(&self) -> &Example {
        &self.example
    }

    /// The namespace the example executes against.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Check if the namespace was built from substitutions.
    pub fn is_mocked(&self) -> bool {
        self.mocked
    }

    /// Execute every step and compare its output with the expected output.
    ///
    /// A failing statement produces `Error: <message>` as its output, so
    /// expected failures can be written into the example. Execution
    /// continues after a mismatch.
    pub fn run(&self, executor: &dyn ExampleExecutor) -> ExampleReport {
        debug!(example = %self.id, mocked = self.mocked, "running example");

        let mut namespace = self.namespace.clone();
        let failures = self
            .example
            .steps
            .iter()
            .filter_map(|step| {
                let actual = match executor.execute(&step.source, &mut namespace) {
                    Ok(output) => output,
                    Err(e) => format!("Error: {}\n", e),
                };
                if normalize(&actual) == normalize(&step.want) {
                    return None;
                }
                Some(StepFailure {
                    lineno: step.lineno,
                    source: step.source.clone(),
                    expected: step.want.clone(),
                    actual,
                })
            })
            .collect();

        ExampleReport {
            id: self.id.clone(),
            steps: self.example.steps.len(),
            failures,
        }
    }
}

/// Strip trailing whitespace from each line and drop trailing blank lines.
fn normalize(output: &str) -> String {
    let mut lines: Vec<&str> = output.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// A step whose output did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Line of the statement within the documentation.
    pub lineno: usize,
    /// The statement source.
    pub source: String,
    /// The expected output.
    pub expected: String,
    /// The output actually produced.
    pub actual: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "line {}: {}", self.lineno, self.source)?;
        writeln!(f, "expected:")?;
        write!(f, "{}", indent(&self.expected))?;
        writeln!(f, "got:")?;
        write!(f, "{}", indent(&self.actual))
    }
}

fn indent(text: &str) -> String {
    if text.is_empty() {
        return "    <nothing>\n".to_string();
    }
    text.lines().map(|line| format!("    {}\n", line)).collect()
}

/// Outcome of running one example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReport {
    id: ExampleId,
    steps: usize,
    failures: Vec<StepFailure>,
}

impl ExampleReport {
    /// The example's identity.
    pub fn id(&self) -> &ExampleId {
        &self.id
    }

    /// Number of steps executed.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Steps whose output did not match.
    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }

    /// Consume the report, returning its failures.
    pub fn into_failures(self) -> Vec<StepFailure> {
        self.failures
    }

    /// Check if every step matched.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest::{ExampleParser, Interpreter, PromptParser};
    use crate::value::{Callable, Value};

    fn bind(doc: &str, namespace: Namespace) -> BoundExample {
        let example = PromptParser.parse(doc).remove(0);
        BoundExample::new(ExampleId::new("m", "f", 0), example, namespace, false)
    }

    #[test]
    fn test_example_id_display_and_order() {
        let a = ExampleId::new("a", "z", 1);
        let b = ExampleId::new("a", "z", 10);
        let c = ExampleId::new("b", "a", 0);

        assert_eq!(a.to_string(), "a.z[1]");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_passing_example() {
        let ns = Namespace::new().with("x", 3);
        let report = bind("```\n>>> x\n3\n>>> y = x\n>>> y\n3\n```", ns).run(&Interpreter::new());

        assert!(report.passed());
        assert_eq!(report.steps(), 3);
        assert_eq!(report.id().to_string(), "m.f[0]");
    }

    #[test]
    fn test_failing_step_is_reported() {
        let ns = Namespace::new().with("x", 3);
        let report = bind("```\n>>> x\n4\n```", ns).run(&Interpreter::new());

        assert!(!report.passed());
        let failure = &report.failures()[0];
        assert_eq!(failure.lineno, 2);
        assert_eq!(failure.expected, "4\n");
        assert_eq!(failure.actual, "3\n");
        assert!(failure.to_string().contains("got:\n    3"));
    }

    #[test]
    fn test_expected_error_output() {
        let ns = Namespace::new().with(
            "fail",
            Callable::new("fail", |_, _| Err("boom".to_string())),
        );
        let report = bind(
            "```\n>>> fail()\nError: fail() failed: boom\n>>> nope\nError: name 'nope' is not defined\n```",
            ns,
        )
        .run(&Interpreter::new());

        assert!(report.passed(), "{:?}", report.failures());
    }

    #[test]
    fn test_trailing_whitespace_is_ignored() {
        let ns = Namespace::new().with(
            "show",
            Callable::new("show", |ctx, _| {
                ctx.print_str("padded   ");
                Ok(Value::None)
            }),
        );
        let report = bind("```\n>>> show()\npadded\n```", ns).run(&Interpreter::new());
        assert!(report.passed());
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let bound = bind("```\n>>> counter\n0\n>>> counter = 1\n```", Namespace::new().with("counter", 0));

        assert!(bound.run(&Interpreter::new()).passed());
        assert!(bound.run(&Interpreter::new()).passed());
        assert_eq!(bound.namespace().get("counter"), Some(&Value::Int(0)));
    }
}
