//! Canonical text rendering of values and expressions.
//!
//! Rendering is the inverse of parsing: the output of any successfully
//! parsed command re-parses to a structurally equal command.

use std::fmt;

use crate::ast::{Command, Container, Expression, ExpressionKind};
use crate::value::{Timestamp, Value, escape};

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.remainder())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Identifier(name) => f.write_str(name),
            Self::String(text) => f.write_str(&escape(text)),
            Self::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Value(value) => write!(f, "{value}"),
            ExpressionKind::Container(container) => write!(f, "{container}"),
            ExpressionKind::Command(command) => write!(f, "{command}"),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let args = self.args.iter().map(ToString::to_string);
        let kwargs = self.kwargs.iter().map(|(k, v)| format!("{k}={v}"));
        let list: Vec<String> = args.chain(kwargs).collect();
        f.write_str(&list.join(", "))?;
        f.write_str("]")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.callable, self.arguments)
    }
}
