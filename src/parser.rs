use std::fmt;

use crate::ast::{Command, Container, Expression, ExpressionKind};
use crate::lexer::tokenize;
use crate::token::{Span, Token, TokenKind};
use crate::value::Value;

/// Deepest bracket nesting a line may use.
pub const MAX_DEPTH: usize = 64;

/// Classifies a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The line contained no tokens at all.
    EmptyInput,
    /// `[` without a matching `]`.
    UnclosedBracket,
    /// A split of an argument list is neither an expression nor a
    /// keyword argument.
    UnparsableArgument,
    /// The line does not start with a command name.
    ExpectedIdentifier,
    /// A literal token whose text cannot be represented.
    InvalidLiteral { text: String },
    /// Brackets, or lines run from within commands, nested deeper
    /// than [`MAX_DEPTH`].
    TooDeep,
}

impl SyntaxErrorKind {
    #[must_use]
    pub fn invalid_literal(text: &str) -> Self {
        Self::InvalidLiteral {
            text: text.to_string(),
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input"),
            Self::UnclosedBracket => write!(f, "open bracket not closed"),
            Self::UnparsableArgument => {
                write!(f, "command argument could not be parsed")
            }
            Self::ExpectedIdentifier => write!(f, "expected identifier"),
            Self::InvalidLiteral { text } => write!(f, "invalid literal: {text}"),
            Self::TooDeep => write!(f, "nested too deeply"),
        }
    }
}

/// Error produced while turning a line into a command tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}..{}", span.start, span.stop)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    #[must_use]
    pub const fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Parse one chat line into a command.
///
/// The line is a command name, an optional bracketed argument list,
/// and optional free text. Free text is passed verbatim as the keyword
/// argument `payload`, even when the list already names one; the
/// duplicate is rejected when the arguments are validated.
///
/// # Errors
///
/// Returns `SyntaxError` for empty input, unbalanced brackets,
/// arguments that are neither expressions nor `key=value` pairs, and
/// lines that do not start with an identifier. Brackets nested more
/// than [`MAX_DEPTH`] levels deep are rejected as well.
pub fn parse(text: &str) -> Result<Command, SyntaxError> {
    let tokens = tokenize(text);
    let Some(first) = tokens.first() else {
        return Err(SyntaxError::new(
            SyntaxErrorKind::EmptyInput,
            Span::new(0, text.len()),
        ));
    };

    let head = match tokens.get(1) {
        Some(open) if open.kind == TokenKind::OpenBracket => {
            let bracket = find_bracket_span(&tokens[1..]).ok_or_else(|| unclosed(open))?;
            &tokens[..=bracket.len()]
        }
        _ => &tokens[..1],
    };

    let expression = parse_expression(head)?
        .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::ExpectedIdentifier, first.span))?;

    let mut command = match expression.kind {
        ExpressionKind::Command(command) if command.name().is_some() => command,
        ExpressionKind::Value(Value::Identifier(name)) => Command {
            callable: Box::new(Expression::value(Value::Identifier(name), expression.span)),
            arguments: Container::new(),
            span: expression.span,
        },
        _ => {
            return Err(SyntaxError::new(
                SyntaxErrorKind::ExpectedIdentifier,
                expression.span,
            ));
        }
    };

    let stop = command.span.stop;
    let rest = &text[stop..];
    let payload = rest.trim();
    if !payload.is_empty() {
        let start = stop + (rest.len() - rest.trim_start().len());
        command.arguments.kwargs.push((
            Expression::value(Value::Identifier("payload".to_string()), Span::new(stop, stop)),
            Expression::value(
                Value::String(payload.to_string()),
                Span::new(start, start + payload.len()),
            ),
        ));
    }

    Ok(command)
}

/// Minimal prefix of `tokens` that starts with `[` and ends with the
/// matching `]`.
///
/// Returns `None` when the first token is not `[` or the brackets never
/// balance.
#[must_use]
pub fn find_bracket_span(tokens: &[Token]) -> Option<&[Token]> {
    if tokens.first()?.kind != TokenKind::OpenBracket {
        return None;
    }

    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseBracket => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Some(&tokens[..=idx]);
        }
    }
    None
}

/// Split `tokens` on `separator`, treating every bracketed group as
/// one unit so separators inside nested lists never split the outer
/// one. A trailing empty segment is dropped; inner empty segments are
/// kept.
///
/// # Errors
///
/// Returns `SyntaxError` when a `[` inside `tokens` is never closed.
pub fn split(tokens: &[Token], separator: TokenKind) -> Result<Vec<&[Token]>, SyntaxError> {
    let mut splits = Vec::new();
    let mut start = 0;
    let mut idx = 0;

    while idx < tokens.len() {
        let token = &tokens[idx];
        if token.kind == separator {
            splits.push(&tokens[start..idx]);
            idx += 1;
            start = idx;
        } else if token.kind == TokenKind::OpenBracket {
            let group = find_bracket_span(&tokens[idx..]).ok_or_else(|| unclosed(token))?;
            idx += group.len();
        } else {
            idx += 1;
        }
    }

    if start < tokens.len() {
        splits.push(&tokens[start..]);
    }

    Ok(splits)
}

/// Parse exactly one literal token.
///
/// # Errors
///
/// Returns `SyntaxError` only for literal tokens whose value is out of
/// range; anything that is simply not a literal yields `Ok(None)`.
pub fn parse_primitive(tokens: &[Token]) -> Result<Option<Expression>, SyntaxError> {
    let [token] = tokens else {
        return Ok(None);
    };
    Ok(Value::from_token(token)?.map(|value| Expression::value(value, token.span)))
}

/// Parse a `key=value` argument.
///
/// # Errors
///
/// Propagates hard errors from nested brackets; a split that is not a
/// keyword argument yields `Ok(None)`.
pub fn parse_kwarg(tokens: &[Token]) -> Result<Option<(Expression, Expression)>, SyntaxError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let segments = split(tokens, TokenKind::Equal)?;
    let [key, value] = segments.as_slice() else {
        return Ok(None);
    };
    pair_at(key, value, 0)
}

fn pair_at(
    key: &[Token],
    value: &[Token],
    depth: usize,
) -> Result<Option<(Expression, Expression)>, SyntaxError> {
    match (expression_at(key, depth)?, expression_at(value, depth)?) {
        (Some(key), Some(value)) => Ok(Some((key, value))),
        _ => Ok(None),
    }
}

/// Parse a literal, a bracketed list, or a call chain `name[..][..]`.
///
/// # Errors
///
/// Returns `SyntaxError` for unbalanced brackets and unparsable
/// arguments inside a call; other mismatches yield `Ok(None)`.
pub fn parse_expression(tokens: &[Token]) -> Result<Option<Expression>, SyntaxError> {
    expression_at(tokens, 0)
}

/// `depth` counts the bracket groups enclosing `tokens`.
fn expression_at(tokens: &[Token], depth: usize) -> Result<Option<Expression>, SyntaxError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    if tokens.len() == 1 {
        return parse_primitive(tokens);
    }

    let (mut callable, mut rest) = if first.kind == TokenKind::OpenBracket {
        let group = find_bracket_span(tokens).ok_or_else(|| unclosed(first))?;
        let container = container_at(group, depth + 1)?;
        let expression = Expression::new(ExpressionKind::Container(container), group_span(group));
        (expression, &tokens[group.len()..])
    } else {
        let Some(seed) = parse_primitive(&tokens[..1])? else {
            return Ok(None);
        };
        (seed, &tokens[1..])
    };

    while let Some(open) = rest.first().filter(|t| t.kind == TokenKind::OpenBracket) {
        let group = find_bracket_span(rest).ok_or_else(|| unclosed(open))?;
        let arguments = container_at(group, depth + 1)?;
        let span = callable.span.to(group_span(group));
        callable = Command {
            callable: Box::new(callable),
            arguments,
            span,
        }
        .into();
        rest = &rest[group.len()..];
    }

    Ok(rest.is_empty().then_some(callable))
}

/// Parse a bracketed argument list, brackets included.
///
/// # Errors
///
/// Returns `SyntaxError` when any comma-separated split is empty or
/// parses neither as an expression nor as a keyword argument.
pub fn parse_container(tokens: &[Token]) -> Result<Container, SyntaxError> {
    container_at(tokens, 1)
}

fn container_at(tokens: &[Token], depth: usize) -> Result<Container, SyntaxError> {
    if depth > MAX_DEPTH {
        let span = tokens.first().map_or_else(Span::default, |open| open.span);
        return Err(SyntaxError::new(SyntaxErrorKind::TooDeep, span));
    }

    let interior = tokens.get(1..tokens.len().saturating_sub(1)).unwrap_or_default();
    let splits = split(interior, TokenKind::Comma)?;

    let mut container = Container::new();
    let mut cursor = 0;
    for segment in &splits {
        if segment.is_empty() {
            let span = interior
                .get(cursor)
                .map_or_else(|| group_span(tokens), |comma| comma.span);
            return Err(SyntaxError::new(SyntaxErrorKind::UnparsableArgument, span));
        }

        // A top-level `=` can only belong to a keyword argument.
        let sides = split(segment, TokenKind::Equal)?;
        if let [key, value] = sides.as_slice() {
            let Some(kwarg) = pair_at(key, value, depth)? else {
                return Err(unparsable(segment));
            };
            container.kwargs.push(kwarg);
        } else {
            let Some(arg) = expression_at(segment, depth)? else {
                return Err(unparsable(segment));
            };
            container.args.push(arg);
        }
        cursor += segment.len() + 1;
    }

    debug_assert_eq!(container.len(), splits.len());
    Ok(container)
}

fn group_span(tokens: &[Token]) -> Span {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.to(last.span),
        _ => Span::default(),
    }
}

fn unparsable(segment: &[Token]) -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::UnparsableArgument, group_span(segment))
}

fn unclosed(open: &Token) -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::UnclosedBracket, open.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Timestamp;

    fn number(n: f64) -> Expression {
        Expression::literal(Value::Number(n))
    }

    fn ident(name: &str) -> Expression {
        Expression::identifier(name)
    }

    #[test]
    fn bracket_span_stops_at_match() {
        let tokens = tokenize("[a, [b], c] d");
        let span = find_bracket_span(&tokens).expect("balanced");
        assert_eq!(span.len(), 9);
        assert_eq!(span.last().map(|t| t.kind), Some(TokenKind::CloseBracket));
    }

    #[test]
    fn bracket_span_requires_open_bracket() {
        assert!(find_bracket_span(&tokenize("a [b]")).is_none());
        assert!(find_bracket_span(&tokenize("[a, [b]")).is_none());
        assert!(find_bracket_span(&[]).is_none());
    }

    #[test]
    fn split_respects_nesting() {
        let tokens = tokenize("a, f[b, c], d");
        let splits = split(&tokens, TokenKind::Comma).expect("split");
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[1].len(), 6);
    }

    #[test]
    fn split_keeps_inner_empty_segments() {
        let tokens = tokenize("a,,b,");
        let splits = split(&tokens, TokenKind::Comma).expect("split");
        assert_eq!(splits.len(), 3);
        assert!(splits[1].is_empty());
    }

    #[test]
    fn split_unclosed_bracket() {
        let tokens = tokenize("a, [b");
        let err = split(&tokens, TokenKind::Comma).expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedBracket);
        assert_eq!(err.span, Span::new(3, 4));
    }

    #[test]
    fn primitive_only_for_single_literal() {
        assert!(parse_primitive(&tokenize("a b")).expect("ok").is_none());
        assert!(parse_primitive(&tokenize(",")).expect("ok").is_none());
        assert_eq!(
            parse_primitive(&tokenize("2:05")).expect("ok"),
            Some(Expression::literal(Value::Timestamp(
                Timestamp::from_seconds(125)
            )))
        );
    }

    #[test]
    fn kwarg_needs_exactly_two_sides() {
        assert!(parse_kwarg(&tokenize("a=1")).expect("ok").is_some());
        assert!(parse_kwarg(&tokenize("a=")).expect("ok").is_none());
        assert!(parse_kwarg(&tokenize("=1")).expect("ok").is_none());
        assert!(parse_kwarg(&tokenize("a=b=c")).expect("ok").is_none());
    }

    #[test]
    fn expression_rejects_trailing_tokens() {
        assert!(parse_expression(&tokenize("f[1] g")).expect("ok").is_none());
        assert!(parse_expression(&tokenize("a b")).expect("ok").is_none());
    }

    #[test]
    fn expression_call_chain() {
        let expression = parse_expression(&tokenize("f[1][2]"))
            .expect("ok")
            .expect("parsed");
        let ExpressionKind::Command(outer) = expression.kind else {
            panic!("expected command");
        };
        assert_eq!(outer.arguments.args, vec![number(2.0)]);
        assert!(matches!(outer.callable.kind, ExpressionKind::Command(_)));
    }

    #[test]
    fn positional_and_keyword() {
        let command = parse("div[1,b=2]").expect("parse");
        assert_eq!(command.name(), Some("div"));
        assert_eq!(command.arguments.args, vec![number(1.0)]);
        assert_eq!(command.arguments.kwargs, vec![(ident("b"), number(2.0))]);
    }

    #[test]
    fn payload_capture() {
        let command = parse("play[start=0:10]   look up a song  ").expect("parse");
        let payload = command.kwarg("payload").expect("payload");
        assert_eq!(
            payload.as_value(),
            Some(&Value::String("look up a song".into()))
        );
        assert_eq!(payload.span, Span::new(19, 33));
    }

    #[test]
    fn payload_is_not_unescaped() {
        let command = parse(r#"say "quoted\n" text"#).expect("parse");
        assert_eq!(
            command.kwarg("payload").and_then(Expression::as_value),
            Some(&Value::String(r#""quoted\n" text"#.into()))
        );
    }

    #[test]
    fn empty_input() {
        let err = parse("   ").expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::EmptyInput);
    }

    #[test]
    fn unclosed_argument_list() {
        let err = parse("cmd[a,[b,c]").expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedBracket);
        assert_eq!(err.span, Span::new(3, 4));
    }

    #[test]
    fn empty_split_points_at_comma() {
        let err = parse("cmd[a,,b]").expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnparsableArgument);
        assert_eq!(err.span, Span::new(6, 7));
    }

    #[test]
    fn leading_literal_is_not_a_command() {
        let err = parse("42 is the answer").expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::ExpectedIdentifier);
        let err = parse("5[1]").expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::ExpectedIdentifier);
        assert_eq!(err.span, Span::new(0, 4));
    }

    #[test]
    fn nested_keyword_keys_parse_in_linear_time() {
        let depth = 30;
        let line = format!("f[{}1{}]", "x[".repeat(depth), "]=1".repeat(depth));
        let started = std::time::Instant::now();
        let command = parse(&line).expect("parse");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        let mut key = &command.arguments.kwargs[0].0;
        let mut levels = 1;
        while let ExpressionKind::Command(call) = &key.kind {
            match call.arguments.kwargs.first() {
                Some((inner, _)) => {
                    key = inner;
                    levels += 1;
                }
                None => break,
            }
        }
        assert_eq!(levels, depth);
    }

    #[test]
    fn nesting_limit() {
        let at_limit = format!("f{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let too_deep = format!("f{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        let err = parse(&too_deep).expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::TooDeep);
        assert_eq!(err.span, Span::new(MAX_DEPTH + 1, MAX_DEPTH + 2));
    }

    #[test]
    fn very_deep_nesting_is_an_error() {
        let line = format!("f{}{}", "[".repeat(20_000), "]".repeat(20_000));
        let err = parse(&line).expect_err("should fail");
        assert_eq!(err.kind, SyntaxErrorKind::TooDeep);
    }

    #[test]
    fn bare_name_gets_empty_arguments() {
        let command = parse("skip").expect("parse");
        assert!(command.arguments.is_empty());
        assert_eq!(command.span, Span::new(0, 4));
    }
}
