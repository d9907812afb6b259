use crate::token::Span;
use crate::value::Value;

/// A node of the parsed command tree.
///
/// The span is diagnostic only: two expressions are equal when their
/// kinds are equal, wherever they appeared in the source.
#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Closed set of expression shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// A literal.
    Value(Value),
    /// A bracketed argument list `[a, b, k=v]`.
    Container(Container),
    /// A call `name[args]`.
    Command(Command),
}

/// Positional and keyword arguments of a bracketed list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub args: Vec<Expression>,
    pub kwargs: Vec<(Expression, Expression)>,
}

/// A call of `callable` with `arguments`.
#[derive(Debug, Clone)]
pub struct Command {
    pub callable: Box<Expression>,
    pub arguments: Container,
    pub span: Span,
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.callable == other.callable && self.arguments == other.arguments
    }
}

impl Expression {
    #[must_use]
    pub const fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn value(value: Value, span: Span) -> Self {
        Self::new(ExpressionKind::Value(value), span)
    }

    /// Identifier literal with no meaningful source location.
    #[must_use]
    pub fn identifier(name: &str) -> Self {
        Self::value(Value::Identifier(name.to_string()), Span::default())
    }

    /// Literal with no meaningful source location.
    #[must_use]
    pub fn literal(value: Value) -> Self {
        Self::value(value, Span::default())
    }

    /// The literal, if this expression is one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match &self.kind {
            ExpressionKind::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl Container {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            args: Vec::new(),
            kwargs: Vec::new(),
        }
    }

    /// Add a positional argument.
    #[must_use]
    pub fn arg(mut self, value: Expression) -> Self {
        self.args.push(value);
        self
    }

    /// Add a keyword argument keyed by an identifier.
    #[must_use]
    pub fn kwarg(mut self, key: &str, value: Expression) -> Self {
        self.kwargs.push((Expression::identifier(key), value));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len() + self.kwargs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Command {
    /// Call of a bare command name.
    #[must_use]
    pub fn new(name: &str, arguments: Container) -> Self {
        Self {
            callable: Box::new(Expression::identifier(name)),
            arguments,
            span: Span::default(),
        }
    }

    /// The command name, when the callable is a plain identifier.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.callable.as_value() {
            Some(Value::Identifier(name)) => Some(name),
            _ => None,
        }
    }

    /// Keyword argument value by key name.
    #[must_use]
    pub fn kwarg(&self, key: &str) -> Option<&Expression> {
        self.arguments.kwargs.iter().find_map(|(k, v)| {
            matches!(k.as_value(), Some(Value::Identifier(name)) if name == key).then_some(v)
        })
    }
}

impl From<Command> for Expression {
    fn from(command: Command) -> Self {
        let span = command.span;
        Self::new(ExpressionKind::Command(command), span)
    }
}
