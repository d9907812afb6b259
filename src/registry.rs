//! Command registry and the evaluator that dispatches into it.

use std::fmt;

use tracing::{debug, info, warn};

use crate::Error;
use crate::ast::{Command, Expression, ExpressionKind};
use crate::bot::{Bot, Message};
use crate::commands;
use crate::lexer::tokenize;
use crate::parser::{MAX_DEPTH, SyntaxError, SyntaxErrorKind, parse};
use crate::signature::{Argument, Bindings, Help, Parameter, TypeError, TypeErrorKind};
use crate::token::{Span, TokenKind};
use crate::value::Value;

/// Implementation of a command. Receives the arguments already
/// validated against the command's parameters.
pub type Handler = fn(&mut Invocation<'_>, &Bindings) -> Result<Option<Value>, Error>;

/// Aliases, signature, and handler of one command.
#[derive(Clone)]
pub struct Descriptor {
    aliases: Vec<String>,
    docstring: String,
    parameters: Vec<Parameter>,
    handler: Handler,
}

impl Descriptor {
    #[must_use]
    pub fn new(aliases: &[&str], handler: Handler) -> Self {
        Self {
            aliases: aliases.iter().map(ToString::to_string).collect(),
            docstring: String::new(),
            parameters: Vec::new(),
            handler,
        }
    }

    #[must_use]
    pub fn doc(mut self, docstring: &str) -> Self {
        self.docstring = docstring.to_string();
        self
    }

    /// Append a parameter to the signature.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }

    /// Signature and documentation, for validation and help text.
    #[must_use]
    pub fn help(&self) -> Help {
        Help {
            aliases: self.aliases.clone(),
            docstring: self.docstring.clone(),
            parameters: self.parameters.clone(),
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.aliases.is_empty() {
            return Err(RegistryError::NoAliases);
        }
        if let Some(alias) = self.aliases.iter().find(|a| !is_identifier(a)) {
            return Err(RegistryError::InvalidAlias {
                alias: alias.clone(),
            });
        }
        let command = self.aliases[0].clone();
        for (idx, parameter) in self.parameters.iter().enumerate() {
            if !is_identifier(&parameter.name) {
                return Err(RegistryError::InvalidParameter {
                    command,
                    parameter: parameter.name.clone(),
                });
            }
            if self.parameters[..idx].iter().any(|p| p.name == parameter.name) {
                return Err(RegistryError::DuplicateParameter {
                    command,
                    parameter: parameter.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

fn is_identifier(text: &str) -> bool {
    matches!(
        tokenize(text).as_slice(),
        [token] if token.kind == TokenKind::Identifier && token.text == text
    )
}

/// A command definition that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("command has no aliases")]
    NoAliases,
    #[error("alias `{alias}` is not an identifier")]
    InvalidAlias { alias: String },
    #[error("parameter `{parameter}` of `{command}` is not an identifier")]
    InvalidParameter { command: String, parameter: String },
    #[error("parameter `{parameter}` of `{command}` is declared twice")]
    DuplicateParameter { command: String, parameter: String },
}

/// Collects command descriptors and validates them all at once.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<Descriptor>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn register(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add the built-in command set.
    #[must_use]
    pub fn builtins(mut self) -> Self {
        self.descriptors.extend(commands::builtin());
        self
    }

    /// Validate every descriptor and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` for a descriptor without aliases, or with
    /// an alias or parameter name that is not an identifier.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            descriptor.validate()?;
            for alias in &descriptor.aliases {
                if self.descriptors[..idx].iter().any(|d| d.accepts(alias)) {
                    warn!(alias = %alias, "alias is shadowed by an earlier command");
                }
            }
        }
        Ok(Registry {
            descriptors: self.descriptors,
        })
    }
}

/// Read-only set of commands, looked up by alias.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding just the built-in commands.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if a built-in descriptor is malformed.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        Self::builder().builtins().build()
    }

    /// First command, in registration order, that answers to `name`.
    #[must_use]
    pub fn find_command(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.accepts(name))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    /// Whether `line` parses into a call of a registered command.
    #[must_use]
    pub fn can_run(&self, line: &str) -> bool {
        parse(line)
            .ok()
            .and_then(|command| command.name().and_then(|name| self.find_command(name)))
            .is_some()
    }

    /// Evaluate an expression.
    ///
    /// Literals evaluate to themselves. A call evaluates its callable,
    /// which must yield an identifier, then its arguments left to right,
    /// validates them, and runs the command. Names no command answers
    /// to evaluate to `null`: such lines are ordinary chat, not errors.
    ///
    /// # Errors
    ///
    /// Returns `Error::Type` when arguments do not fit the signature or
    /// the callable is not an identifier, and whatever the handler
    /// itself returns.
    pub fn run(
        &self,
        bot: &mut dyn Bot,
        message: &Message,
        expression: &Expression,
    ) -> Result<Value, Error> {
        self.run_at(bot, message, expression, 0)
    }

    /// Evaluate a call. See [`Registry::run`].
    ///
    /// # Errors
    ///
    /// As for [`Registry::run`].
    pub fn call(
        &self,
        bot: &mut dyn Bot,
        message: &Message,
        command: &Command,
    ) -> Result<Value, Error> {
        self.call_at(bot, message, command, 0)
    }

    /// `nesting` counts the handlers that re-entered the evaluator.
    fn run_at(
        &self,
        bot: &mut dyn Bot,
        message: &Message,
        expression: &Expression,
        nesting: usize,
    ) -> Result<Value, Error> {
        match &expression.kind {
            ExpressionKind::Value(value) => Ok(value.clone()),
            ExpressionKind::Container(_) => {
                Err(TypeError::new(TypeErrorKind::CannotEvaluate, expression.span).into())
            }
            ExpressionKind::Command(command) => self.call_at(bot, message, command, nesting),
        }
    }

    fn call_at(
        &self,
        bot: &mut dyn Bot,
        message: &Message,
        command: &Command,
        nesting: usize,
    ) -> Result<Value, Error> {
        let name = match self.run_at(bot, message, &command.callable, nesting)? {
            Value::Identifier(name) => name,
            other => {
                return Err(TypeError::new(
                    TypeErrorKind::NotCallable {
                        got: other.kind_name().to_string(),
                    },
                    command.callable.span,
                )
                .into());
            }
        };

        let Some(descriptor) = self.find_command(&name) else {
            debug!(name = %name, "not a command");
            return Ok(Value::Null);
        };

        let mut args = Vec::with_capacity(command.arguments.args.len());
        for arg in &command.arguments.args {
            args.push(self.evaluate(bot, message, arg, nesting)?);
        }

        let mut kwargs = Vec::with_capacity(command.arguments.kwargs.len());
        for (key, value) in &command.arguments.kwargs {
            let key = self.evaluate(bot, message, key, nesting)?;
            let value = self.evaluate(bot, message, value, nesting)?;
            kwargs.push((key, value));
        }

        let bindings = descriptor.help().validate(&args, &kwargs)?;

        info!(command = %descriptor.aliases[0], alias = %name, "running command");
        let mut invocation = Invocation {
            registry: self,
            bot,
            message,
            nesting,
        };
        let result = (descriptor.handler)(&mut invocation, &bindings)?;
        Ok(result.unwrap_or(Value::Null))
    }

    fn evaluate(
        &self,
        bot: &mut dyn Bot,
        message: &Message,
        expression: &Expression,
        nesting: usize,
    ) -> Result<Argument, Error> {
        Ok(Argument {
            value: self.run_at(bot, message, expression, nesting)?,
            span: expression.span,
        })
    }
}

/// Context a handler runs in: built fresh for every call.
pub struct Invocation<'a> {
    pub registry: &'a Registry,
    pub bot: &'a mut dyn Bot,
    pub message: &'a Message,
    nesting: usize,
}

impl Invocation<'_> {
    /// Reply in the channel the message came from.
    pub fn respond(&mut self, text: &str) {
        self.bot.respond(&self.message.channel, text);
    }

    /// Parse and run another command line on behalf of the same message.
    ///
    /// # Errors
    ///
    /// Returns any syntax or type error raised by the line, and a
    /// `TooDeep` syntax error once lines have been re-entered
    /// [`MAX_DEPTH`] times.
    pub fn run_line(&mut self, line: &str) -> Result<Value, Error> {
        if self.nesting >= MAX_DEPTH {
            return Err(
                SyntaxError::new(SyntaxErrorKind::TooDeep, Span::new(0, line.len())).into(),
            );
        }
        let command = parse(line)?;
        self.registry
            .call_at(self.bot, self.message, &command, self.nesting + 1)
    }
}
