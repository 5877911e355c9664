//! The five-state tokeniser of §4.1.
//!
//! The tokeniser never fails on arbitrary input: every state always makes
//! progress and the run always terminates in exactly one [`TokenKind::Eol`]
//! (§8 "Tokeniser totality").

use crate::token::{Token, TokenKind};

#[derive(Clone, Copy)]
enum State {
    ReadingToken,
    ReadingIdentifier { at_start: bool },
    ReadingIdQuantity,
    ReadingFunction,
    ReadingFunctionArgs,
}

enum Trans {
    Continue(State),
    Done,
}

/// Tokenises `input` into a token stream terminated by a single `Eol`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.byte_offset()]
    }

    fn push(&mut self, kind: TokenKind, text: &'a str, offset: usize) {
        self.tokens.push(Token::new(kind, text, offset));
    }

    fn run(mut self) -> Vec<Token<'a>> {
        let mut state = State::ReadingToken;
        loop {
            let trans = match state {
                State::ReadingToken => self.read_token(),
                State::ReadingIdentifier { at_start } => self.read_identifier(at_start),
                State::ReadingIdQuantity => self.read_id_quantity(),
                State::ReadingFunction => self.read_function(),
                State::ReadingFunctionArgs => self.read_function_args(),
            };
            match trans {
                Trans::Continue(next) => state = next,
                Trans::Done => break,
            }
        }
        let eol_offset = self.input.len();
        self.push(TokenKind::Eol, "", eol_offset);
        self.tokens
    }

    fn read_token(&mut self) -> Trans {
        loop {
            match self.peek() {
                None => return Trans::Done,
                Some(c) if c.is_whitespace() => self.advance(),
                Some('|') => {
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::Pipe, "|", off);
                    return Trans::Continue(State::ReadingIdentifier { at_start: true });
                }
                Some('{') => {
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::LCurly, "{", off);
                    return Trans::Continue(State::ReadingFunction);
                }
                Some('(') => {
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::LParen, "(", off);
                }
                Some(')') => {
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::RParen, ")", off);
                }
                Some(c) if is_ident_char(c) => {
                    let start = self.byte_offset();
                    while matches!(self.peek(), Some(c) if is_ident_char(c)) {
                        self.advance();
                    }
                    let text = self.slice_from(start);
                    self.push(match_and_or(text), text, start);
                }
                Some(_) => {
                    // Punctuation the grammar doesn't expect at this level. The
                    // tokeniser never errors, so it is swallowed as a one-char
                    // ident and left for the parser to reject.
                    let start = self.byte_offset();
                    self.advance();
                    let text = self.slice_from(start);
                    self.push(TokenKind::Ident, text, start);
                }
            }
        }
    }

    fn read_identifier(&mut self, at_start: bool) -> Trans {
        if at_start {
            if let Some('@') = self.peek() {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::At, "@", off);
            }
        }
        let start = self.byte_offset();
        loop {
            match self.peek() {
                None => {
                    let text = self.slice_from(start);
                    self.push(TokenKind::Ident, text, start);
                    return Trans::Done;
                }
                Some(':') => {
                    let text = self.slice_from(start);
                    self.push(TokenKind::Ident, text, start);
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::Colon, ":", off);
                    return Trans::Continue(State::ReadingIdQuantity);
                }
                Some('|') => {
                    let text = self.slice_from(start);
                    self.push(TokenKind::Ident, text, start);
                    let off = self.byte_offset();
                    self.advance();
                    self.push(TokenKind::Pipe, "|", off);
                    return Trans::Continue(State::ReadingToken);
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_id_quantity(&mut self) -> Trans {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        match self.peek() {
            None => Trans::Done,
            Some('|') => {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::Pipe, "|", off);
                Trans::Continue(State::ReadingToken)
            }
            Some('%') => {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::Percent, "%", off);
                Trans::Continue(State::ReadingIdQuantity)
            }
            Some(_) => {
                let start = self.byte_offset();
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '|' && c != '%')
                {
                    self.advance();
                }
                let text = self.slice_from(start);
                self.push(match_all_half(text), text, start);
                Trans::Continue(State::ReadingIdQuantity)
            }
        }
    }

    fn read_function(&mut self) -> Trans {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        match self.peek() {
            None => Trans::Done,
            Some('(') => {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::LParen, "(", off);
                Trans::Continue(State::ReadingFunctionArgs)
            }
            Some('}') => {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::RCurly, "}", off);
                Trans::Continue(State::ReadingToken)
            }
            Some(_) => {
                let start = self.byte_offset();
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '(' && c != '}')
                {
                    self.advance();
                }
                let text = self.slice_from(start);
                self.push(TokenKind::Ident, text, start);
                Trans::Continue(State::ReadingFunction)
            }
        }
    }

    fn read_function_args(&mut self) -> Trans {
        match self.peek() {
            None => Trans::Done,
            Some(')') => {
                let off = self.byte_offset();
                self.advance();
                self.push(TokenKind::RParen, ")", off);
                Trans::Continue(State::ReadingFunction)
            }
            Some(_) => {
                let start = self.byte_offset();
                while matches!(self.peek(), Some(c) if c != ')') {
                    self.advance();
                }
                let text = self.slice_from(start);
                self.push(TokenKind::Ident, text, start);
                Trans::Continue(State::ReadingFunctionArgs)
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn match_and_or(text: &str) -> TokenKind {
    if text.eq_ignore_ascii_case("AND") {
        TokenKind::And
    } else if text.eq_ignore_ascii_case("OR") {
        TokenKind::Or
    } else {
        TokenKind::Ident
    }
}

fn match_all_half(text: &str) -> TokenKind {
    if text.eq_ignore_ascii_case("ALL") {
        TokenKind::All
    } else if text.eq_ignore_ascii_case("HALF") {
        TokenKind::Half
    } else {
        TokenKind::Ident
    }
}
