//! Typed command signatures and argument validation.

use std::fmt;

use crate::token::Span;
use crate::value::{Timestamp, Value};

/// Classifies a type error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeErrorKind {
    TooManyArguments {
        expected: usize,
        got: usize,
    },
    InvalidType {
        parameter: String,
        expected: String,
        got: String,
    },
    InvalidKeyType {
        got: String,
    },
    UnknownParameter {
        key: String,
        expected: Vec<String>,
    },
    SpecifiedTwice {
        parameter: String,
    },
    DuplicateKey {
        key: String,
    },
    MissingParameter {
        parameter: String,
    },
    /// The callable of a call did not evaluate to an identifier.
    NotCallable {
        got: String,
    },
    /// A bare `[..]` list used where a value is needed.
    CannotEvaluate,
    /// A command rejected values that passed validation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyArguments { expected, got } => write!(
                f,
                "too many arguments given: expected {expected}, got {got}"
            ),
            Self::InvalidType {
                parameter,
                expected,
                got,
            } => write!(
                f,
                "invalid type for parameter `{parameter}`: expected {expected}, got {got}"
            ),
            Self::InvalidKeyType { got } => {
                write!(f, "invalid type for key: expected Identifier, got {got}")
            }
            Self::UnknownParameter { key, expected } => write!(
                f,
                "unknown parameter `{key}`, expected one of [{}]",
                expected.join(", ")
            ),
            Self::SpecifiedTwice { parameter } => {
                write!(f, "parameter `{parameter}` specified twice")
            }
            Self::DuplicateKey { key } => write!(f, "duplicate key `{key}`"),
            Self::MissingParameter { parameter } => {
                write!(f, "mandatory parameter `{parameter}` not specified")
            }
            Self::NotCallable { got } => write!(
                f,
                "callable expression must result in identifier, got {got}"
            ),
            Self::CannotEvaluate => write!(f, "cannot evaluate an argument list"),
            Self::InvalidOperation { message } => f.write_str(message),
        }
    }
}

/// Error produced when a parsed command does not fit its signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", location(.span))]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Option<Span>,
}

fn location(span: &Option<Span>) -> String {
    span.map(|s| format!(" at {}..{}", s.start, s.stop))
        .unwrap_or_default()
}

impl TypeError {
    #[must_use]
    pub const fn new(kind: TypeErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    #[must_use]
    pub const fn unspanned(kind: TypeErrorKind) -> Self {
        Self { kind, span: None }
    }
}

/// Literal kinds a parameter can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Anything.
    Expression,
    /// Any literal, `null` included.
    Value,
    Number,
    Identifier,
    String,
    Timestamp,
}

impl Kind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Expression => "Expression",
            Self::Value => "Value",
            Self::Number => "Number",
            Self::Identifier => "Identifier",
            Self::String => "String",
            Self::Timestamp => "Timestamp",
        }
    }

    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Expression | Self::Value => true,
            Self::Number => matches!(value, Value::Number(_)),
            Self::Identifier => matches!(value, Value::Identifier(_)),
            Self::String => matches!(value, Value::String(_)),
            Self::Timestamp => matches!(value, Value::Timestamp(_)),
        }
    }
}

/// One declared parameter of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Accepted kinds; more than one makes a union.
    pub kinds: Vec<Kind>,
    /// `None` marks a required parameter.
    pub default: Option<Value>,
}

impl Parameter {
    #[must_use]
    pub fn required(name: &str, kinds: &[Kind]) -> Self {
        Self {
            name: name.to_string(),
            kinds: kinds.to_vec(),
            default: None,
        }
    }

    /// Parameter that defaults to `null`.
    #[must_use]
    pub fn optional(name: &str, kinds: &[Kind]) -> Self {
        Self {
            default: Some(Value::Null),
            ..Self::required(name, kinds)
        }
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Whether `value` may be bound to this parameter. The declared
    /// default is always accepted, whatever its kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.default.as_ref() == Some(value) || self.kinds.iter().any(|k| k.accepts(value))
    }

    #[must_use]
    pub fn type_name(&self) -> String {
        self.kinds
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name())?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// An evaluated argument and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: Value,
    pub span: Span,
}

/// Signature and documentation of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Help {
    pub aliases: Vec<String>,
    pub docstring: String,
    pub parameters: Vec<Parameter>,
}

impl Help {
    #[must_use]
    pub fn index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// Check evaluated arguments against the declared parameters and
    /// bind them by name, filling defaults for anything omitted.
    ///
    /// Checks run in a fixed order, each over the whole argument set:
    /// arity, positional types, key types, unknown keys, keys that
    /// repeat a positional, keyword types, duplicate keys, and finally
    /// required parameters left unbound.
    ///
    /// # Errors
    ///
    /// Returns the first `TypeError` found.
    pub fn validate(
        &self,
        args: &[Argument],
        kwargs: &[(Argument, Argument)],
    ) -> Result<Bindings, TypeError> {
        if args.len() > self.parameters.len() {
            let extra = &args[self.parameters.len()];
            return Err(TypeError::new(
                TypeErrorKind::TooManyArguments {
                    expected: self.parameters.len(),
                    got: args.len(),
                },
                extra.span,
            ));
        }

        for (parameter, arg) in self.parameters.iter().zip(args) {
            check_type(parameter, arg)?;
        }

        let mut keys = Vec::with_capacity(kwargs.len());
        for (key, _) in kwargs {
            let Value::Identifier(name) = &key.value else {
                return Err(TypeError::new(
                    TypeErrorKind::InvalidKeyType {
                        got: key.value.kind_name().to_string(),
                    },
                    key.span,
                ));
            };
            keys.push((name.as_str(), key.span));
        }

        let mut indices = Vec::with_capacity(keys.len());
        for &(name, span) in &keys {
            let Some(idx) = self.index(name) else {
                return Err(TypeError::new(
                    TypeErrorKind::UnknownParameter {
                        key: name.to_string(),
                        expected: self.parameters.iter().map(|p| p.name.clone()).collect(),
                    },
                    span,
                ));
            };
            indices.push(idx);
        }

        for (&(name, span), &idx) in keys.iter().zip(&indices) {
            if idx < args.len() {
                return Err(TypeError::new(
                    TypeErrorKind::SpecifiedTwice {
                        parameter: name.to_string(),
                    },
                    span,
                ));
            }
        }

        for ((_, value), &idx) in kwargs.iter().zip(&indices) {
            check_type(&self.parameters[idx], value)?;
        }

        for (pos, &(name, span)) in keys.iter().enumerate() {
            if keys[..pos].iter().any(|&(earlier, _)| earlier == name) {
                return Err(TypeError::new(
                    TypeErrorKind::DuplicateKey {
                        key: name.to_string(),
                    },
                    span,
                ));
            }
        }

        for (idx, parameter) in self.parameters.iter().enumerate().skip(args.len()) {
            if parameter.is_required() && !indices.contains(&idx) {
                return Err(TypeError::unspanned(TypeErrorKind::MissingParameter {
                    parameter: parameter.name.clone(),
                }));
            }
        }

        let values = self
            .parameters
            .iter()
            .enumerate()
            .map(|(idx, parameter)| {
                let bound = args.get(idx).map(|arg| &arg.value).or_else(|| {
                    indices
                        .iter()
                        .position(|&i| i == idx)
                        .map(|pos| &kwargs[pos].1.value)
                });
                let value = bound
                    .or(parameter.default.as_ref())
                    .cloned()
                    .unwrap_or(Value::Null);
                (parameter.name.clone(), value)
            })
            .collect();

        Ok(Bindings { values })
    }

    /// Human-readable help text.
    #[must_use]
    pub fn format(&self) -> String {
        let signature = self
            .parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!(
            "Aliases: {}\nSignature: [{signature}]",
            self.aliases.join(", ")
        );
        if !self.docstring.is_empty() {
            out.push_str("\n\n");
            out.push_str(self.docstring.trim());
        }
        out
    }
}

fn check_type(parameter: &Parameter, arg: &Argument) -> Result<(), TypeError> {
    if parameter.accepts(&arg.value) {
        return Ok(());
    }
    Err(TypeError::new(
        TypeErrorKind::InvalidType {
            parameter: parameter.name.clone(),
            expected: parameter.type_name(),
            got: arg.value.kind_name().to_string(),
        },
        arg.span,
    ))
}

/// Validated arguments, bound to parameter names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bindings {
    values: Vec<(String, Value)>,
}

impl Bindings {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// The bound value, `None` when it is `null`.
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|value| !value.is_null())
    }

    /// The bound value of a parameter the command declared.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` when no such parameter was bound.
    pub fn value(&self, name: &str) -> Result<&Value, TypeError> {
        self.get(name).ok_or_else(|| {
            TypeError::unspanned(TypeErrorKind::MissingParameter {
                parameter: name.to_string(),
            })
        })
    }

    /// Text of an identifier or string parameter.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` when the parameter is missing or not text.
    pub fn text(&self, name: &str) -> Result<&str, TypeError> {
        let value = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(name, "Identifier | String", value))
    }

    /// An optional timestamp parameter.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` when the parameter is bound to anything but a
    /// timestamp or `null`.
    pub fn timestamp(&self, name: &str) -> Result<Option<Timestamp>, TypeError> {
        match self.value(name)? {
            Value::Null => Ok(None),
            Value::Timestamp(ts) => Ok(Some(*ts)),
            other => Err(mismatch(name, "Timestamp", other)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn mismatch(parameter: &str, expected: &str, got: &Value) -> TypeError {
    TypeError::unspanned(TypeErrorKind::InvalidType {
        parameter: parameter.to_string(),
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    })
}
