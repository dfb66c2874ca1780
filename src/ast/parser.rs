//! The token cursor shared by every clause/expression parser function.
//! A hand-written recursive-descent cursor rather than a PEG-generated
//! one (see DESIGN.md for why this repo parses its own token stream
//! instead of reaching for a grammar crate).

use crate::error::{ErrorKind, RexxError, SourceLocation};
use crate::lexer::{Token, TokenKind};

pub type ParseResult<T> = Result<T, RexxError>;

pub struct TokenParser {
    tokens: Vec<Token>,
    pos: usize,
    filename: String,
}

impl TokenParser {
    pub fn new(tokens: Vec<Token>, filename: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            filename: filename.into(),
        }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn current_line(&self) -> usize {
        self.peek().line
    }

    pub fn loc(&self) -> SourceLocation {
        SourceLocation::new(self.current_line(), String::new(), self.filename.clone())
    }

    pub fn error(&self, message: impl Into<String>) -> RexxError {
        RexxError::new(ErrorKind::Syntax, message, self.loc())
    }

    /// Skip any run of clause-separator noise (newlines, `;`).
    pub fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Semi) {
            self.advance();
        }
    }

    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn check_ident(&self, word: &str) -> bool {
        self.peek().is_ident_upper(word)
    }

    pub fn expect_kind(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.check_kind(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {what}, found '{}'",
                self.peek().lexeme
            )))
        }
    }

    pub fn expect_ident(&mut self, word: &str) -> ParseResult<Token> {
        if self.check_ident(word) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected keyword '{word}', found '{}'",
                self.peek().lexeme
            )))
        }
    }

    /// Consume an identifier that is expected to be a keyword, if
    /// present, returning whether it matched.
    pub fn eat_ident(&mut self, word: &str) -> bool {
        if self.check_ident(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_op(&mut self, op: &str) -> bool {
        if self.peek().kind == TokenKind::Op && self.peek().lexeme == op {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn check_op(&self, op: &str) -> bool {
        self.peek().kind == TokenKind::Op && self.peek().lexeme == op
    }
}
