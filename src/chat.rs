//! Entry point for incoming chat messages.

use tracing::{debug, info, warn};

use crate::bot::{Bot, Message};
use crate::lexer::tokenize;
use crate::registry::Registry;
use crate::token::TokenKind;
use crate::value::Value;
use crate::{Error, run_line};

/// The command lines a message carries.
///
/// A message fenced in triple back-ticks is a batch of lines, blank
/// lines skipped. Any other multi-line message carries none.
#[must_use]
pub fn command_lines(content: &str) -> Option<Batch<'_>> {
    let trimmed = content.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        let lines = inner.lines().filter(|line| !line.trim().is_empty()).collect();
        return Some(Batch {
            lines,
            fenced: true,
        });
    }
    if content.contains('\n') {
        return None;
    }
    Some(Batch {
        lines: vec![content],
        fenced: false,
    })
}

/// Lines extracted from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<'a> {
    pub lines: Vec<&'a str>,
    pub fenced: bool,
}

/// User-facing rendering of an error.
#[must_use]
pub fn report(error: &Error) -> String {
    format!("```Could not run command:\n    {}: {error}```", error.label())
}

/// Whether `line` starts with the name of a registered command.
fn addresses_command(registry: &Registry, line: &str) -> bool {
    tokenize(line).first().is_some_and(|token| {
        token.kind == TokenKind::Identifier && registry.find_command(&token.text).is_some()
    })
}

/// Parse and run every command line of a chat message.
///
/// Errors never escape: each failing line is logged, and reported back
/// to the channel when the line was meant for a command. A fenced batch
/// runs only when every one of its lines names a registered command.
///
/// Returns the outcome of each line that was run, in order.
pub fn handle_message(
    registry: &Registry,
    bot: &mut dyn Bot,
    message: &Message,
) -> Vec<Result<Value, Error>> {
    let Some(batch) = command_lines(&message.content) else {
        debug!(author = %message.author, "ignoring multi-line message");
        return Vec::new();
    };

    if batch.fenced {
        if let Some((idx, line)) = batch
            .lines
            .iter()
            .enumerate()
            .find(|(_, line)| !registry.can_run(line))
        {
            warn!(line = %line, index = idx, "cannot run batch command");
            return Vec::new();
        }
    }

    info!(author = %message.author, content = %message.content, "parsing");

    let mut outcomes = Vec::with_capacity(batch.lines.len());
    for (idx, line) in batch.lines.iter().enumerate() {
        let outcome = run_line(registry, bot, message, line);
        if let Err(e) = &outcome {
            warn!(index = idx, line = %line, error = %e, "command failed");
            if addresses_command(registry, line) {
                bot.respond(&message.channel, &report(e));
            }
        }
        outcomes.push(outcome);
    }
    outcomes
}
