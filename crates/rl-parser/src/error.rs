//! Parser errors (§4.2 "Error handling", §7 "Parse-failure").
//!
//! Parsing never panics and never throws across the public boundary: a
//! malformed `requires` string always comes back as `Err(ParseError)`, and
//! callers install `None` as that location's tree (§7).

use crate::token::TokenKind;

#[derive(Debug, Clone, thiserror::Error)]
#[error("unexpected {found:?} at token {token_index} (expected {expected})")]
pub struct ParseError {
    /// Index of the offending token within the token stream produced by
    /// [`crate::lexer::tokenize`] for this `requires` string.
    pub token_index: usize,
    /// Byte offset of the offending token in the source string.
    pub offset: usize,
    pub found: TokenKind,
    pub expected: &'static str,
}
