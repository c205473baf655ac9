//! Extracting examples from documentation text.

/// One prompt statement and the output it is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The statement source, continuation lines joined with `\n`.
    pub source: String,
    /// Expected output, one line per output line, `\n`-terminated.
    pub want: String,
    /// 1-based line of the statement within the documentation.
    pub lineno: usize,
}

/// An example block: the unit that becomes one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// 0-based position among the examples extracted from the same item.
    pub position: usize,
    /// 1-based line of the block's opening fence.
    pub lineno: usize,
    /// Statements in execution order.
    pub steps: Vec<Step>,
}

/// Parses documentation text into examples.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn ExampleParser`.
pub trait ExampleParser: Send + Sync {
    /// Extract every example from `doc`, in document order, numbering
    /// positions from 0.
    fn parse(&self, doc: &str) -> Vec<Example>;
}

/// Prompt-style example parser.
///
/// Examples live in fenced code blocks. Inside a block, `>>> ` starts a
/// statement, `... ` continues it, and the lines up to the next prompt are
/// its expected output. Blocks tagged `ignore` or `text` and blocks without
/// any prompt are skipped.
///
/// # Example
///
/// ```
/// use mockable_doctests::doctest::{ExampleParser, PromptParser};
///
/// let doc = "Adds numbers.\n\
///            \n\
///            ```\n\
///            >>> add(1,\n\
///            ...     2)\n\
///            3\n\
///            ```\n";
///
/// let examples = PromptParser.parse(doc);
/// assert_eq!(examples.len(), 1);
/// assert_eq!(examples[0].steps[0].source, "add(1,\n    2)");
/// assert_eq!(examples[0].steps[0].want, "3\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptParser;

const FENCE: &str = "```";
const PROMPT: &str = ">>>";
const CONTINUATION: &str = "...";
const SKIPPED_TAGS: [&str; 2] = ["ignore", "text"];

impl ExampleParser for PromptParser {
    fn parse(&self, doc: &str) -> Vec<Example> {
        let mut examples = Vec::new();
        let mut lines = doc.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let trimmed = line.trim_start();
            let Some(info) = trimmed.strip_prefix(FENCE) else {
                continue;
            };
            let indent = line.len() - trimmed.len();
            let skipped = info
                .split(|c: char| c == ',' || c.is_whitespace())
                .any(|tag| SKIPPED_TAGS.contains(&tag));

            let mut body = Vec::new();
            for (body_index, body_line) in lines.by_ref() {
                if body_line.trim_start().starts_with(FENCE) {
                    break;
                }
                body.push((body_index + 1, strip_indent(body_line, indent)));
            }

            if skipped {
                continue;
            }
            let steps = parse_steps(&body);
            if !steps.is_empty() {
                examples.push(Example {
                    position: examples.len(),
                    lineno: index + 1,
                    steps,
                });
            }
        }

        examples
    }
}

/// Remove up to `indent` leading spaces.
fn strip_indent(line: &str, indent: usize) -> &str {
    let leading = line.len() - line.trim_start_matches(' ').len();
    &line[leading.min(indent)..]
}

/// Split `line` on a prompt marker: the marker alone or followed by a space.
fn strip_prompt<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let line = line.trim_start();
    if line == marker {
        return Some("");
    }
    line.strip_prefix(marker)?.strip_prefix(' ')
}

fn parse_steps(body: &[(usize, &str)]) -> Vec<Step> {
    let mut steps: Vec<Step> = Vec::new();

    for &(lineno, line) in body {
        if let Some(source) = strip_prompt(line, PROMPT) {
            steps.push(Step {
                source: source.to_string(),
                want: String::new(),
                lineno,
            });
            continue;
        }

        let Some(step) = steps.last_mut() else {
            continue;
        };

        match strip_prompt(line, CONTINUATION) {
            Some(more) if step.want.is_empty() => {
                step.source.push('\n');
                step.source.push_str(more);
            }
            _ => {
                step.want.push_str(line);
                step.want.push('\n');
            }
        }
    }

    for step in &mut steps {
        while step.want.ends_with("\n\n") {
            step.want.pop();
        }
        if step.want.trim().is_empty() {
            step.want.clear();
        }
    }
    steps
}
