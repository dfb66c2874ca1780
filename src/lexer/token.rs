//! Token representation: `(kind, lexeme, line)` as required by
//! `spec.md` §4.1 — a flat struct rather than a per-variant enum,
//! since there is no reachable derive macro to generate the variant
//! boilerplate here (see DESIGN.md).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    String,
    Op,
    Dot,
    Comma,
    LParen,
    RParen,
    Semi,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn upper(&self) -> String {
        self.lexeme.to_uppercase()
    }

    pub fn is_ident_upper(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.upper() == word
    }
}
