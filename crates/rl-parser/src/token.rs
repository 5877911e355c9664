//! Token kinds produced by the tokeniser (§4.1).

/// A single lexical token. `Ident` tokens carry the matched slice as a view
/// into the original `requires` string; all other kinds carry the matched
/// punctuation or keyword text for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character of this token in the source.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub(crate) fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eol,
    And,
    Or,
    LParen,
    RParen,
    Pipe,
    At,
    Colon,
    All,
    Half,
    Percent,
    LCurly,
    RCurly,
    Ident,
}

impl TokenKind {
    pub fn is_eol(self) -> bool {
        matches!(self, TokenKind::Eol)
    }
}
