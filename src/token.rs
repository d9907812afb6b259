/// Half-open byte range `start..stop` into the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub stop: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let stop = if self.stop > other.stop {
            self.stop
        } else {
            other.stop
        };
        Self { start, stop }
    }
}

/// Token kinds produced by the lexer.
///
/// Declaration order is match priority: at each position the first
/// kind whose pattern matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `,`
    Comma,
    /// `=`
    Equal,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `M:SS`, e.g. `1:05`.
    Timestamp,
    /// `-?[0-9]+(\.[0-9]+)?`
    Number,
    /// The `null` keyword.
    Null,
    /// Word characters.
    Identifier,
    /// Quoted string literal, escapes not yet evaluated.
    String,
    /// Any other run of non-space characters.
    Unknown,
}

impl TokenKind {
    /// All kinds in match priority order.
    pub const ALL: [Self; 10] = [
        Self::Comma,
        Self::Equal,
        Self::OpenBracket,
        Self::CloseBracket,
        Self::Timestamp,
        Self::Number,
        Self::Null,
        Self::Identifier,
        Self::String,
        Self::Unknown,
    ];

    /// Capture group name used in the combined lexer pattern.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comma => "COMMA",
            Self::Equal => "EQUAL",
            Self::OpenBracket => "OPEN_BRACKET",
            Self::CloseBracket => "CLOSE_BRACKET",
            Self::Timestamp => "TIMESTAMP",
            Self::Number => "NUMBER",
            Self::Null => "NULL",
            Self::Identifier => "IDENTIFIER",
            Self::String => "STRING",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Equal => "=",
            Self::OpenBracket => r"\[",
            Self::CloseBracket => r"\]",
            Self::Timestamp => "-?[0-9]+:[0-9]+",
            Self::Number => r"-?[0-9]+(?:\.[0-9]+)?",
            Self::Null => r"null\b",
            Self::Identifier => r"\w+",
            Self::String => r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#,
            Self::Unknown => r"\S+",
        }
    }
}

/// A single token with its kind, source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
