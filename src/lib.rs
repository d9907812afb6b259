//! Chat command language for a voice announcement bot.
//!
//! A chat line such as `play[start=0:10] some song title` is tokenized,
//! parsed into a small call tree, and evaluated against a registry of
//! commands with typed parameters.
//!
//! # Quick start
//!
//! ## Parse a line
//!
//! ```
//! use announcer::{Value, parse};
//!
//! let command = parse("play[start=0:10] some song title").unwrap();
//! assert_eq!(command.name(), Some("play"));
//! assert_eq!(
//!     command.kwarg("payload").and_then(|e| e.as_value()),
//!     Some(&Value::String("some song title".into()))
//! );
//! assert_eq!(command.to_string(), r#"play[start=00:10, payload="some song title"]"#);
//! ```
//!
//! ## Evaluate it
//!
//! ```
//! use announcer::{ConsoleBot, Config, Message, Registry, Value, parse};
//!
//! let registry = Registry::with_builtins().unwrap();
//! let mut bot = ConsoleBot::new(Config::default());
//! let message = Message::new("alice", "general", "add[1, mul[2, 3]]");
//!
//! let command = parse(&message.content).unwrap();
//! let result = registry.call(&mut bot, &message, &command).unwrap();
//! assert_eq!(result, Value::Number(7.0));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod bot;
pub mod chat;
pub mod commands;
pub mod config;
pub mod console;
pub mod formatter;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod signature;
pub mod token;
pub mod value;

pub use ast::{Command, Container, Expression, ExpressionKind};
pub use bot::{Bot, Destination, DownloadRequest, Message, SongRequest};
pub use chat::handle_message;
pub use config::Config;
pub use console::ConsoleBot;
pub use lexer::tokenize;
pub use parser::{SyntaxError, SyntaxErrorKind, parse};
pub use registry::{Descriptor, Handler, Invocation, Registry, RegistryBuilder, RegistryError};
pub use signature::{Argument, Bindings, Help, Kind, Parameter, TypeError, TypeErrorKind};
pub use token::{Span, Token, TokenKind};
pub use value::{Timestamp, Value};

/// Unified error type covering parsing and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The line could not become a command tree.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// The command tree does not fit the command it calls.
    #[error("{0}")]
    Type(#[from] TypeError),
}

impl Error {
    /// Short name of the error family, for user-facing reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "SyntaxError",
            Self::Type(_) => "TypeError",
        }
    }
}

/// Parse a line and evaluate it in one step.
pub fn run_line(
    registry: &Registry,
    bot: &mut dyn Bot,
    message: &Message,
    line: &str,
) -> Result<Value, Error> {
    let command = parse(line)?;
    registry.call(bot, message, &command)
}
