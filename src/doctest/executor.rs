//! Running example statements against a namespace.
//!
//! The bundled [`Interpreter`] understands a small expression language,
//! enough for examples to call documented functions, inspect attributes,
//! and rebind names:
//!
//! ```text
//! statement  := target '=' expr | expr
//! target     := NAME ('.' NAME)*
//! expr       := '-'? primary ('.' NAME | '(' args? ')')*
//! primary    := NAME | INT | FLOAT | STRING | True | False | None
//!             | '[' args? ']' | '(' expr ')'
//! args       := expr (',' expr)* ','?
//! ```
//!
//! An expression statement prints the repr of its value unless the value is
//! `None`. Text after `#` is a comment.

use super::ExecutionError;
use crate::namespace::Namespace;
use crate::value::{CallContext, Value};
use std::fmt;

/// Executes one example statement.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn ExampleExecutor`.
pub trait ExampleExecutor: Send + Sync {
    /// Execute `source` against `namespace`, returning everything the
    /// statement printed.
    ///
    /// Assignments rebind names in `namespace`, so later statements of the
    /// same example see them.
    fn execute(&self, source: &str, namespace: &mut Namespace) -> Result<String, ExecutionError>;
}

/// The bundled statement interpreter.
///
/// # Example
///
/// ```
/// use mockable_doctests::doctest::{ExampleExecutor, Interpreter};
/// use mockable_doctests::namespace::Namespace;
///
/// let mut namespace = Namespace::new();
/// let interpreter = Interpreter::new();
///
/// assert_eq!(interpreter.execute("x = [1, 'two']", &mut namespace).unwrap(), "");
/// assert_eq!(interpreter.execute("x", &mut namespace).unwrap(), "[1, 'two']\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter;

impl Interpreter {
    /// Create an interpreter.
    pub const fn new() -> Self {
        Self
    }

    fn evaluate(
        &self,
        expr: &Expr,
        namespace: &Namespace,
        output: &mut String,
    ) -> Result<Value, ExecutionError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => namespace
                .get(name)
                .cloned()
                .ok_or_else(|| ExecutionError::undefined_name(name)),
            Expr::List(items) => items
                .iter()
                .map(|item| self.evaluate(item, namespace, output))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Neg(inner) => match self.evaluate(inner, namespace, output)? {
                Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
                    ExecutionError::Overflow {
                        operation: "unary -".to_string(),
                    }
                }),
                Value::Float(x) => Ok(Value::Float(-x)),
                other => Err(ExecutionError::syntax(format!(
                    "bad operand type for unary -: '{}'",
                    other.type_name()
                ))),
            },
            Expr::Attr(base, attribute) => {
                let value = self.evaluate(base, namespace, output)?;
                let object = value.as_object().ok_or_else(|| ExecutionError::NotAnObject {
                    path: base.to_string(),
                    type_name: value.type_name().to_string(),
                })?;
                object
                    .get_attr(attribute)
                    .ok_or_else(|| ExecutionError::MissingAttribute {
                        owner: object.type_name().to_string(),
                        attribute: attribute.clone(),
                    })
            }
            Expr::Call(callee, args) => {
                let function = self.evaluate(callee, namespace, output)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg, namespace, output))
                    .collect::<Result<Vec<_>, _>>()?;
                let callable = function.as_callable().ok_or_else(|| ExecutionError::NotCallable {
                    type_name: function.type_name().to_string(),
                })?;

                let mut ctx = CallContext::new(namespace, output);
                callable
                    .call(&mut ctx, &args)
                    .map_err(|message| ExecutionError::call_failed(callable.name(), message))
            }
        }
    }
}

impl ExampleExecutor for Interpreter {
    fn execute(&self, source: &str, namespace: &mut Namespace) -> Result<String, ExecutionError> {
        let statement = Parser::new(tokenize(source)?).statement()?;
        let mut output = String::new();

        match statement {
            Statement::Expr(expr) => {
                let value = self.evaluate(&expr, namespace, &mut output)?;
                if !value.is_none() {
                    output.push_str(&value.to_string());
                    output.push('\n');
                }
            }
            Statement::Assign(target, expr) => {
                let value = self.evaluate(&expr, namespace, &mut output)?;
                namespace.set_path(&target, value)?;
            }
        }

        Ok(output)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Equals,
    Minus,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "{}", name),
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::Str(s) => write!(f, "{:?}", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Equals => write!(f, "="),
            Token::Minus => write!(f, "-"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExecutionError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '(' | ')' | '[' | ']' | ',' | '.' | '=' | '-' => {
                chars.next();
                tokens.push(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    ',' => Token::Comma,
                    '.' => Token::Dot,
                    '=' => Token::Equals,
                    _ => Token::Minus,
                });
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(string_literal(&mut chars, c)?));
            }
            c if c.is_ascii_digit() => {
                let mut text = String::new();
                while let Some(d) = chars.next_if(|c| c.is_ascii_digit() || *c == '_') {
                    text.push(d);
                }
                // A dot followed by a digit continues the number; otherwise it
                // is attribute access.
                let mut lookahead = chars.clone();
                let is_float = lookahead.next() == Some('.')
                    && lookahead.next().is_some_and(|c| c.is_ascii_digit());
                if is_float {
                    text.push('.');
                    chars.next();
                    while let Some(d) = chars.next_if(|c| c.is_ascii_digit() || *c == '_') {
                        text.push(d);
                    }
                }
                tokens.push(number_literal(&text.replace('_', ""), is_float)?);
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(ch) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
                    name.push(ch);
                }
                tokens.push(Token::Ident(name));
            }
            other => {
                return Err(ExecutionError::syntax(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn string_literal(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    quote: char,
) -> Result<String, ExecutionError> {
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(ExecutionError::syntax("unterminated string literal")),
            Some(c) if c == quote => return Ok(text),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(c) => text.push(c),
                None => return Err(ExecutionError::syntax("unterminated string literal")),
            },
            Some(c) => text.push(c),
        }
    }
}

fn number_literal(text: &str, is_float: bool) -> Result<Token, ExecutionError> {
    let token = if is_float {
        text.parse().ok().map(Token::Float)
    } else {
        text.parse().ok().map(Token::Int)
    };
    token.ok_or_else(|| ExecutionError::syntax(format!("invalid number '{}'", text)))
}

#[derive(Debug, Clone)]
enum Expr {
    Literal(Value),
    Name(String),
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Attr(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
}

impl Expr {
    /// The attribute path this expression names, if it is an assignable
    /// target.
    fn target(&self) -> Option<Vec<String>> {
        match self {
            Expr::Name(name) => Some(vec![name.clone()]),
            Expr::Attr(base, attribute) => {
                let mut path = base.target()?;
                path.push(attribute.clone());
                Some(path)
            }
            _ => None,
        }
    }
}

/// Source-like rendering, used to name values in error messages.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::List(_) => write!(f, "[...]"),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Attr(base, attribute) => write!(f, "{}.{}", base, attribute),
            Expr::Call(callee, _) => write!(f, "{}(...)", callee),
        }
    }
}

enum Statement {
    Expr(Expr),
    Assign(Vec<String>, Expr),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExecutionError> {
        match self.advance() {
            Some(token) if &token == expected => Ok(()),
            Some(token) => Err(ExecutionError::syntax(format!(
                "expected '{}', found '{}'",
                expected, token
            ))),
            None => Err(ExecutionError::syntax(format!(
                "expected '{}', found end of input",
                expected
            ))),
        }
    }

    fn statement(&mut self) -> Result<Statement, ExecutionError> {
        if self.tokens.is_empty() {
            return Err(ExecutionError::syntax("empty statement"));
        }

        let expr = self.expr()?;
        let statement = if self.eat(&Token::Equals) {
            let target = expr
                .target()
                .ok_or_else(|| ExecutionError::syntax(format!("cannot assign to {}", expr)))?;
            Statement::Assign(target, self.expr()?)
        } else {
            Statement::Expr(expr)
        };

        match self.peek() {
            None => Ok(statement),
            Some(token) => Err(ExecutionError::syntax(format!("unexpected '{}'", token))),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExecutionError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.expr()?)));
        }

        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(Token::Ident(name)) => expr = Expr::Attr(Box::new(expr), name),
                    _ => return Err(ExecutionError::syntax("expected attribute name after '.'")),
                }
            } else if self.eat(&Token::LParen) {
                let args = self.args(&Token::RParen)?;
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ExecutionError> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::Float(x)) => Ok(Expr::Literal(Value::Float(x))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "None" => Expr::Literal(Value::None),
                "True" => Expr::Literal(Value::Bool(true)),
                "False" => Expr::Literal(Value::Bool(false)),
                _ => Expr::Name(name),
            }),
            Some(Token::LBracket) => Ok(Expr::List(self.args(&Token::RBracket)?)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(ExecutionError::syntax(format!("unexpected '{}'", token))),
            None => Err(ExecutionError::syntax("unexpected end of input")),
        }
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    fn args(&mut self, close: &Token) -> Result<Vec<Expr>, ExecutionError> {
        let mut args = Vec::new();
        while !self.eat(close) {
            args.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                break;
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Callable, Record};

    fn run(source: &str, namespace: &mut Namespace) -> Result<String, ExecutionError> {
        Interpreter::new().execute(source, namespace)
    }

    fn sample() -> Namespace {
        Namespace::new()
            .with("answer", 42)
            .with(
                "config",
                Record::new("Config").with("db", Record::new("Db").with("port", 5432)),
            )
            .with(
                "add",
                Callable::new("add", |_, args| match args {
                    [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
                    _ => Err("expected two integers".to_string()),
                }),
            )
            .with(
                "shout",
                Callable::new("shout", |ctx, args| {
                    for arg in args {
                        ctx.print_str(&arg.to_display_string().to_uppercase());
                    }
                    Ok(Value::None)
                }),
            )
    }

    #[test]
    fn test_literals() {
        let mut ns = Namespace::new();
        assert_eq!(run("1", &mut ns).unwrap(), "1\n");
        assert_eq!(run("-3", &mut ns).unwrap(), "-3\n");
        assert_eq!(run("2.5", &mut ns).unwrap(), "2.5\n");
        assert_eq!(run("1_000", &mut ns).unwrap(), "1000\n");
        assert_eq!(run("'it\\'s'", &mut ns).unwrap(), "'it\\'s'\n");
        assert_eq!(run("\"double\"", &mut ns).unwrap(), "'double'\n");
        assert_eq!(run("True", &mut ns).unwrap(), "True\n");
        assert_eq!(run("None", &mut ns).unwrap(), "");
        assert_eq!(run("[1, [2], 'x',]", &mut ns).unwrap(), "[1, [2], 'x']\n");
        assert_eq!(run("[]", &mut ns).unwrap(), "[]\n");
    }

    #[test]
    fn test_names_and_attributes() {
        let mut ns = sample();
        assert_eq!(run("answer", &mut ns).unwrap(), "42\n");
        assert_eq!(run("config.db.port", &mut ns).unwrap(), "5432\n");
        assert_eq!(run("(config).db.port  # comment", &mut ns).unwrap(), "5432\n");
    }

    #[test]
    fn test_calls() {
        let mut ns = sample();
        assert_eq!(run("add(1, 2)", &mut ns).unwrap(), "3\n");
        assert_eq!(run("add(\n    40,\n    2)", &mut ns).unwrap(), "42\n");
        assert_eq!(run("shout('a', 'b')", &mut ns).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_assignment_persists() {
        let mut ns = sample();
        assert_eq!(run("total = add(answer, 1)", &mut ns).unwrap(), "");
        assert_eq!(ns.get("total"), Some(&Value::Int(43)));

        run("config.db.port = 6543", &mut ns).unwrap();
        assert_eq!(ns.resolve("config.db.port"), Some(Value::Int(6543)));
    }

    #[test]
    fn test_assignment_does_not_touch_shared_objects() {
        let original = sample();
        let mut ns = original.clone();

        run("config.db.port = 1", &mut ns).unwrap();

        assert_eq!(original.resolve("config.db.port"), Some(Value::Int(5432)));
    }

    #[test]
    fn test_runtime_errors() {
        let mut ns = sample();
        assert_eq!(
            run("missing", &mut ns).unwrap_err(),
            ExecutionError::undefined_name("missing")
        );
        assert_eq!(
            run("config.nope", &mut ns).unwrap_err().to_string(),
            "'Config' has no attribute 'nope'"
        );
        assert_eq!(
            run("answer()", &mut ns).unwrap_err().to_string(),
            "'int' object is not callable"
        );
        assert_eq!(
            run("answer.real", &mut ns).unwrap_err().to_string(),
            "'answer' is a int, not an object"
        );
        assert_eq!(
            run("add('a')", &mut ns).unwrap_err(),
            ExecutionError::call_failed("add", "expected two integers")
        );
        assert!(matches!(
            run("unknown.attr = 1", &mut ns).unwrap_err(),
            ExecutionError::UndefinedName { .. }
        ));
    }

    #[test]
    fn test_negating_min_int_reports_overflow() {
        let mut ns = Namespace::new().with("x", Value::Int(i64::MIN));

        let error = run("-x", &mut ns).unwrap_err();
        assert_eq!(
            error,
            ExecutionError::Overflow {
                operation: "unary -".to_string()
            }
        );
        assert_eq!(error.to_string(), "integer overflow in unary -");
        assert_eq!(run("--x", &mut ns).unwrap_err(), error);

        let mut ns = Namespace::new().with("x", Value::Int(i64::MAX));
        assert_eq!(run("-x", &mut ns).unwrap(), format!("{}\n", -i64::MAX));
    }

    #[test]
    fn test_syntax_errors() {
        let mut ns = sample();
        for source in ["", "add(1", "1 2", "add(1) = 3", "'open", "a.", "$", "-'x'"] {
            assert!(
                matches!(run(source, &mut ns), Err(ExecutionError::Syntax { .. })),
                "expected syntax error for {:?}",
                source
            );
        }
    }
}
