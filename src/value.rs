//! Literal values: the closed set of things an expression can evaluate to.

use crate::parser::{SyntaxError, SyntaxErrorKind};
use crate::signature::{TypeError, TypeErrorKind};
use crate::token::{Token, TokenKind};

/// An immutable literal value.
///
/// `Null` doubles as the "no value" marker: it is what a command that
/// produced nothing evaluates to, and what an absent optional
/// parameter is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Identifier(String),
    String(String),
    Timestamp(Timestamp),
}

/// A position within a song, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
}

impl Timestamp {
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Whole minutes, rounded towards negative infinity.
    #[must_use]
    pub const fn minutes(self) -> i64 {
        self.seconds.div_euclid(60)
    }

    /// Seconds past the last whole minute, always in `0..60`.
    #[must_use]
    pub const fn remainder(self) -> i64 {
        self.seconds.rem_euclid(60)
    }

    /// Parse `M:SS` text. Minutes may be negative or span many digits;
    /// seconds past 59 carry into minutes.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (minutes, seconds) = text.split_once(':')?;
        let minutes: i64 = minutes.parse().ok()?;
        let seconds: i64 = seconds.parse().ok()?;
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .map(Self::from_seconds)
    }
}

impl Value {
    /// Build a literal from a single token.
    ///
    /// Returns `Ok(None)` for tokens that are not literals at all, and
    /// an error for literal tokens whose text is out of range.
    pub fn from_token(token: &Token) -> Result<Option<Self>, SyntaxError> {
        let value = match token.kind {
            TokenKind::Null => Self::Null,
            TokenKind::Identifier => Self::Identifier(token.text.clone()),
            TokenKind::Number => token
                .text
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(|| {
                    SyntaxError::new(SyntaxErrorKind::invalid_literal(&token.text), token.span)
                })?,
            TokenKind::Timestamp => Timestamp::parse(&token.text)
                .map(Self::Timestamp)
                .ok_or_else(|| {
                    SyntaxError::new(SyntaxErrorKind::invalid_literal(&token.text), token.span)
                })?,
            TokenKind::String => unescape(&token.text)
                .map(Self::String)
                .ok_or_else(|| {
                    SyntaxError::new(SyntaxErrorKind::invalid_literal(&token.text), token.span)
                })?,
            TokenKind::Comma
            | TokenKind::Equal
            | TokenKind::OpenBracket
            | TokenKind::CloseBracket
            | TokenKind::Unknown => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Name of the literal kind, as used in signatures and errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Number(_) => "Number",
            Self::Identifier(_) => "Identifier",
            Self::String(_) => "String",
            Self::Timestamp(_) => "Timestamp",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text of an identifier or string, `None` for other kinds.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Identifier(s) | Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, TypeError> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(a + b)),
            (Self::Identifier(a), Self::Identifier(b)) => Ok(Self::Identifier(format!("{a}{b}"))),
            (Self::String(a), Self::String(b)) => Ok(Self::String(format!("{a}{b}"))),
            (Self::Timestamp(a), Self::Timestamp(b)) => a
                .seconds
                .checked_add(b.seconds)
                .map(|s| Self::Timestamp(Timestamp::from_seconds(s)))
                .ok_or_else(|| operation_error("timestamp overflow")),
            _ => Err(unsupported("+", self, other)),
        }
    }

    pub fn sub(&self, other: &Self) -> Result<Self, TypeError> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(a - b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => a
                .seconds
                .checked_sub(b.seconds)
                .map(|s| Self::Timestamp(Timestamp::from_seconds(s)))
                .ok_or_else(|| operation_error("timestamp overflow")),
            _ => Err(unsupported("-", self, other)),
        }
    }

    pub fn mul(&self, other: &Self) -> Result<Self, TypeError> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(a * b)),
            _ => Err(unsupported("*", self, other)),
        }
    }

    /// Floored division.
    pub fn div(&self, other: &Self) -> Result<Self, TypeError> {
        match (self, other) {
            (Self::Number(_), Self::Number(b)) if *b == 0.0 => {
                Err(operation_error("division by zero"))
            }
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number((a / b).floor())),
            _ => Err(unsupported("/", self, other)),
        }
    }

    /// Floored modulo: the result takes the sign of the divisor.
    pub fn rem(&self, other: &Self) -> Result<Self, TypeError> {
        match (self, other) {
            (Self::Number(_), Self::Number(b)) if *b == 0.0 => {
                Err(operation_error("modulo by zero"))
            }
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(a - b * (a / b).floor())),
            _ => Err(unsupported("%", self, other)),
        }
    }
}

fn operation_error(message: &str) -> TypeError {
    TypeError::unspanned(TypeErrorKind::InvalidOperation {
        message: message.to_string(),
    })
}

fn unsupported(op: &str, left: &Value, right: &Value) -> TypeError {
    operation_error(&format!(
        "unsupported operand types for {op}: {} and {}",
        left.kind_name(),
        right.kind_name()
    ))
}

/// Evaluate a quoted string literal, including its surrounding quotes.
///
/// Unknown escapes are kept verbatim, backslash included.
#[must_use]
pub fn unescape(literal: &str) -> Option<String> {
    let quote = literal.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = literal
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => {
                let digits = [chars.next()?, chars.next()?];
                if !digits.iter().all(char::is_ascii_hexdigit) {
                    return None;
                }
                let hex: String = digits.iter().collect();
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        c => hex.push(c),
                    }
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Some(out)
}

/// Render text as a double-quoted literal that [`unescape`] reverses.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{{{:x}}}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parts() {
        let ts = Timestamp::parse("5:30").expect("valid timestamp");
        assert_eq!(ts.seconds(), 330);
        assert_eq!(ts.minutes(), 5);
        assert_eq!(ts.remainder(), 30);
    }

    #[test]
    fn timestamp_seconds_carry() {
        let ts = Timestamp::parse("1:75").expect("valid timestamp");
        assert_eq!(ts.seconds(), 135);
        assert_eq!(ts.minutes(), 2);
        assert_eq!(ts.remainder(), 15);
    }

    #[test]
    fn negative_timestamp_floors() {
        let ts = Timestamp::parse("-1:30").expect("valid timestamp");
        assert_eq!(ts.seconds(), -30);
        assert_eq!(ts.minutes(), -1);
        assert_eq!(ts.remainder(), 30);
    }

    #[test]
    fn timestamp_overflow_is_rejected() {
        assert!(Timestamp::parse("99999999999999999999:00").is_none());
    }

    #[test]
    fn number_overflow_is_rejected() {
        let text = "9".repeat(310);
        let token = Token {
            kind: TokenKind::Number,
            text: text.clone(),
            span: crate::token::Span::new(0, text.len()),
        };
        let err = Value::from_token(&token).expect_err("out of range");
        assert_eq!(err.kind, SyntaxErrorKind::invalid_literal(&text));

        let token = Token {
            kind: TokenKind::Number,
            text: "2.5".into(),
            span: crate::token::Span::new(0, 3),
        };
        assert_eq!(Value::from_token(&token), Ok(Some(Value::Number(2.5))));
    }

    #[test]
    fn unescape_standard_escapes() {
        assert_eq!(unescape(r#""a\nb""#).as_deref(), Some("a\nb"));
        assert_eq!(unescape(r#""say \"hi\"""#).as_deref(), Some("say \"hi\""));
        assert_eq!(unescape(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(unescape(r#""\x41\u{263a}""#).as_deref(), Some("A\u{263a}"));
    }

    #[test]
    fn unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r#""C:\dir""#).as_deref(), Some(r"C:\dir"));
    }

    #[test]
    fn unescape_rejects_broken_hex() {
        assert_eq!(unescape(r#""\xZZ""#), None);
        assert_eq!(unescape(r#""\x4""#), None);
        assert_eq!(unescape(r#""\x+1""#), None);
        assert_eq!(unescape(r#""\u{41""#), None);
        assert_eq!(unescape(r#""\u{}""#), None);
    }

    #[test]
    fn escape_reverses_unescape() {
        let text = "line\n\"quoted\" back\\slash\u{7}";
        assert_eq!(unescape(&escape(text)).as_deref(), Some(text));
    }

    #[test]
    fn number_arithmetic() {
        let seven = Value::Number(7.0);
        let two = Value::Number(2.0);
        assert_eq!(seven.add(&two), Ok(Value::Number(9.0)));
        assert_eq!(seven.sub(&two), Ok(Value::Number(5.0)));
        assert_eq!(seven.mul(&two), Ok(Value::Number(14.0)));
        assert_eq!(seven.div(&two), Ok(Value::Number(3.0)));
        assert_eq!(Value::Number(-7.0).rem(&two), Ok(Value::Number(1.0)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = Value::Number(1.0)
            .div(&Value::Number(0.0))
            .expect_err("should fail");
        assert!(matches!(err.kind, TypeErrorKind::InvalidOperation { .. }));
    }

    #[test]
    fn concatenation() {
        let a = Value::String("ab".into());
        let b = Value::String("cd".into());
        assert_eq!(a.add(&b), Ok(Value::String("abcd".into())));
        let a = Value::Identifier("ab".into());
        let b = Value::Identifier("cd".into());
        assert_eq!(a.add(&b), Ok(Value::Identifier("abcd".into())));
    }

    #[test]
    fn mixed_kinds_do_not_add() {
        let err = Value::Number(1.0)
            .add(&Value::String("x".into()))
            .expect_err("should fail");
        assert!(err.to_string().contains("Number and String"));
    }
}
