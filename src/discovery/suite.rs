//! Test cases, suites, and their run reports.

use crate::doctest::{BoundExample, CollectionError, ExampleExecutor, StepFailure};
use std::fmt;

/// One test the external runner can execute.
///
/// A collection failure is a test of its own: running it always fails with
/// the collection error, so a broken mock declaration is never reported as
/// passed or skipped.
#[derive(Debug, Clone)]
pub enum TestCase {
    /// An example bound to its namespace.
    Example(BoundExample),
    /// An example or declaration that could not be collected.
    CollectionFailure(CollectionError),
}

impl TestCase {
    /// Test identifier, `module.function[position]` for examples.
    pub fn id(&self) -> String {
        match self {
            TestCase::Example(bound) => bound.id().to_string(),
            TestCase::CollectionFailure(error) => error.test_id(),
        }
    }

    /// Key tests are ordered by: module, function, example position.
    pub fn sort_key(&self) -> (&str, &str, Option<usize>) {
        match self {
            TestCase::Example(bound) => {
                let id = bound.id();
                (id.module(), id.function(), Some(id.position()))
            }
            TestCase::CollectionFailure(error) => (
                error.module(),
                error.function().unwrap_or_default(),
                error.position(),
            ),
        }
    }

    /// Check if this case stands for a collection failure.
    pub fn is_collection_failure(&self) -> bool {
        matches!(self, TestCase::CollectionFailure(_))
    }

    /// Execute the test.
    pub fn run(&self, executor: &dyn ExampleExecutor) -> TestReport {
        let outcome = match self {
            TestCase::Example(bound) => {
                let report = bound.run(executor);
                if report.passed() {
                    TestOutcome::Passed
                } else {
                    TestOutcome::Failed(report.into_failures())
                }
            }
            TestCase::CollectionFailure(error) => TestOutcome::CollectionError(error.to_string()),
        };
        TestReport {
            id: self.id(),
            outcome,
        }
    }
}

impl From<BoundExample> for TestCase {
    fn from(bound: BoundExample) -> Self {
        TestCase::Example(bound)
    }
}

impl From<CollectionError> for TestCase {
    fn from(error: CollectionError) -> Self {
        TestCase::CollectionFailure(error)
    }
}

impl From<Result<BoundExample, CollectionError>> for TestCase {
    fn from(result: Result<BoundExample, CollectionError>) -> Self {
        match result {
            Ok(bound) => bound.into(),
            Err(error) => error.into(),
        }
    }
}

/// How a test ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Every step matched.
    Passed,
    /// Some steps did not match.
    Failed(Vec<StepFailure>),
    /// The test could not be collected.
    CollectionError(String),
}

/// Result of running one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Test identifier.
    pub id: String,
    /// The outcome.
    pub outcome: TestOutcome,
}

impl TestReport {
    /// Check if the test passed.
    pub fn passed(&self) -> bool {
        self.outcome == TestOutcome::Passed
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TestOutcome::Passed => write!(f, "{} ... ok", self.id),
            TestOutcome::Failed(failures) => {
                writeln!(f, "{} ... FAILED", self.id)?;
                for failure in failures {
                    write!(f, "{}", failure)?;
                }
                Ok(())
            }
            TestOutcome::CollectionError(message) => {
                write!(f, "{} ... ERROR\n{}", self.id, message)
            }
        }
    }
}

/// An ordered collection of tests.
///
/// # Example
///
/// ```
/// use mockable_doctests::discovery::{TestCase, TestSuite};
/// use mockable_doctests::doctest::{CollectionError, Interpreter};
///
/// let mut suite = TestSuite::new();
/// suite.add(TestCase::CollectionFailure(CollectionError::UnknownModule {
///     module: "ghost".to_string(),
/// }));
///
/// let report = suite.run(&Interpreter::new());
/// assert_eq!(report.total(), 1);
/// assert!(!report.is_success());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    /// Create an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test.
    pub fn add(&mut self, case: impl Into<TestCase>) {
        self.cases.push(case.into());
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check if the suite is empty.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The tests, in order.
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Consume the suite, returning its tests.
    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    /// Test identifiers, in order.
    pub fn ids(&self) -> Vec<String> {
        self.cases.iter().map(TestCase::id).collect()
    }

    /// Collection errors among the tests.
    pub fn collection_errors(&self) -> Vec<&CollectionError> {
        self.cases
            .iter()
            .filter_map(|case| match case {
                TestCase::CollectionFailure(error) => Some(error),
                TestCase::Example(_) => None,
            })
            .collect()
    }

    /// Run every test in order.
    pub fn run(&self, executor: &dyn ExampleExecutor) -> SuiteReport {
        SuiteReport {
            reports: self.cases.iter().map(|case| case.run(executor)).collect(),
        }
    }
}

impl Extend<TestCase> for TestSuite {
    fn extend<T: IntoIterator<Item = TestCase>>(&mut self, iter: T) {
        self.cases.extend(iter);
    }
}

impl FromIterator<TestCase> for TestSuite {
    fn from_iter<T: IntoIterator<Item = TestCase>>(iter: T) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TestSuite {
    type Item = TestCase;
    type IntoIter = std::vec::IntoIter<TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

/// Reports for every test of a suite run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    reports: Vec<TestReport>,
}

impl SuiteReport {
    /// Build a report from individual test reports.
    pub fn new(reports: Vec<TestReport>) -> Self {
        Self { reports }
    }

    /// All reports, in run order.
    pub fn reports(&self) -> &[TestReport] {
        &self.reports
    }

    /// Number of tests run.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Number of tests that passed.
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    /// Number of tests that failed or could not be collected.
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Reports of tests that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &TestReport> {
        self.reports.iter().filter(|r| !r.passed())
    }

    /// Check if every test passed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest::{ExampleId, ExampleParser, Interpreter, PromptParser};
    use crate::namespace::Namespace;

    fn example(function: &str, position: usize, doc: &str) -> TestCase {
        let example = PromptParser.parse(doc).remove(0);
        let id = ExampleId::new("m", function, position);
        TestCase::Example(BoundExample::new(
            id,
            example,
            Namespace::new().with("x", 1),
            false,
        ))
    }

    #[test]
    fn test_case_ids_and_keys() {
        let case = example("f", 2, "```\n>>> x\n1\n```");
        assert_eq!(case.id(), "m.f[2]");
        assert_eq!(case.sort_key(), ("m", "f", Some(2)));
        assert!(!case.is_collection_failure());

        let failure: TestCase = CollectionError::UnknownFunction {
            module: "m".to_string(),
            function: "g".to_string(),
        }
        .into();
        assert_eq!(failure.id(), "m.g");
        assert_eq!(failure.sort_key(), ("m", "g", None));
        assert!(failure.is_collection_failure());
    }

    #[test]
    fn test_suite_run_counts() {
        let suite: TestSuite = vec![
            example("f", 0, "```\n>>> x\n1\n```"),
            example("f", 1, "```\n>>> x\n2\n```"),
            CollectionError::UnknownModule {
                module: "ghost".to_string(),
            }
            .into(),
        ]
        .into_iter()
        .collect();

        let report = suite.run(&Interpreter::new());
        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 2);
        assert!(!report.is_success());

        let failed: Vec<&str> = report.failures().map(|r| r.id.as_str()).collect();
        assert_eq!(failed, vec!["m.f[1]", "ghost"]);
        assert_eq!(suite.collection_errors().len(), 1);
    }

    #[test]
    fn test_report_display() {
        let case = example("f", 0, "```\n>>> x\n2\n```");
        let report = case.run(&Interpreter::new());

        let text = report.to_string();
        assert!(text.starts_with("m.f[0] ... FAILED"));
        assert!(text.contains("expected:\n    2"));

        let ok = example("f", 0, "```\n>>> x\n1\n```").run(&Interpreter::new());
        assert_eq!(ok.to_string(), "m.f[0] ... ok");
    }

    #[test]
    fn test_from_result() {
        let error: Result<BoundExample, CollectionError> = Err(CollectionError::UnknownModule {
            module: "x".to_string(),
        });
        assert!(TestCase::from(error).is_collection_failure());
    }
}
