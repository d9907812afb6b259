use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::token::{Span, Token, TokenKind};

/// Every token pattern joined into one alternation, in priority order.
static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TokenKind::ALL
        .iter()
        .map(|kind| format!("(?P<{}>{})", kind.name(), kind.pattern()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap_or_else(|e| panic!("invalid token pattern: {e}"))
});

/// Tokenize a command line into a sequence of tokens.
///
/// Lexing never fails: any run of non-space characters that no other
/// pattern recognises becomes a [`TokenKind::Unknown`] token, and is
/// rejected later by the parser wherever it ends up.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    PATTERN.captures_iter(input).filter_map(make_token).collect()
}

fn make_token(captures: Captures<'_>) -> Option<Token> {
    TokenKind::ALL.iter().find_map(|&kind| {
        captures.name(kind.name()).map(|m| Token {
            kind,
            text: m.as_str().to_string(),
            span: Span::new(m.start(), m.end()),
        })
    })
}
