//! Source text → token stream. See `spec.md` §4.1.
//!
//! Hand-written, char-at-a-time scanner over `Peekable<Chars>` with
//! line tracking (see DESIGN.md for the grounding of this style).

mod token;

pub use token::{Token, TokenKind};

use std::iter::Peekable;
use std::str::Chars;

use log::trace;
use once_cell::sync::Lazy;

use crate::error::{ErrorKind, RexxError, SourceLocation};

/// Multi-character operator lexemes, longest-match-first so that e.g.
/// `||` is lexed before `|` (`spec.md` §4.1's max-munch rule).
static TWO_CHAR_OPS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "**", "==", "<>", "><", ">=", "<=", "\\=", "\\<", "\\>", "&&", "||",
    ]
});

const ONE_CHAR_OPS: &str = "+-*/%=><&|\\";

pub struct Lexer<'a> {
    filename: String,
    chars: Peekable<Chars<'a>>,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, start_line: usize, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            chars: source.chars().peekable(),
            line: start_line,
            tokens: Vec::new(),
        }
    }

    fn loc(&self) -> SourceLocation {
        SourceLocation::new(self.line, String::new(), self.filename.clone())
    }

    fn error(&self, message: impl Into<String>) -> RexxError {
        RexxError::new(ErrorKind::Syntax, message, self.loc())
    }

    pub fn lex(mut self) -> Result<Vec<Token>, RexxError> {
        trace!("lexing source starting at line {}", self.line);
        loop {
            let Some(&next) = self.chars.peek() else {
                self.tokens.push(Token::new(TokenKind::Eof, "", self.line));
                break;
            };

            match next {
                ' ' | '\t' | '\r' => {
                    self.chars.next();
                }
                '\n' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::Newline, "\n", self.line));
                    self.line += 1;
                }
                '/' => {
                    self.chars.next();
                    if self.chars.peek() == Some(&'*') {
                        self.chars.next();
                        self.lex_block_comment()?;
                    } else {
                        self.push_op('/');
                    }
                }
                '\'' | '"' => self.lex_string(next)?,
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_alphabetic() || c == '_' => self.lex_ident(),
                '.' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::Dot, ".", self.line));
                }
                ',' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::Comma, ",", self.line));
                }
                '(' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::LParen, "(", self.line));
                }
                ')' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::RParen, ")", self.line));
                }
                ';' => {
                    self.chars.next();
                    self.tokens.push(Token::new(TokenKind::Semi, ";", self.line));
                }
                c if ONE_CHAR_OPS.contains(c) => {
                    self.chars.next();
                    self.push_op(c);
                }
                other => {
                    self.chars.next();
                    self.tokens
                        .push(Token::new(TokenKind::Op, other.to_string(), self.line));
                }
            }
        }

        Ok(self.tokens)
    }

    /// After consuming the first char of a (possible) two-char
    /// operator, check whether the max-munch combination is known; if
    /// so consume the second char too.
    fn push_op(&mut self, first: char) {
        if let Some(&second) = self.chars.peek() {
            let combo: String = [first, second].iter().collect();
            if TWO_CHAR_OPS.iter().any(|op| *op == combo) {
                self.chars.next();
                self.tokens.push(Token::new(TokenKind::Op, combo, self.line));
                return;
            }
        }
        self.tokens
            .push(Token::new(TokenKind::Op, first.to_string(), self.line));
    }

    fn lex_block_comment(&mut self) -> Result<(), RexxError> {
        let start_line = self.line;
        loop {
            match self.chars.next() {
                None => {
                    return Err(RexxError::new(
                        ErrorKind::Syntax,
                        "unterminated block comment",
                        SourceLocation::new(start_line, String::new(), self.filename.clone()),
                    ))
                }
                Some('\n') => self.line += 1,
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.chars.next();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<(), RexxError> {
        let start_line = self.line;
        self.chars.next(); // opening quote
        let mut value = String::new();

        loop {
            match self.chars.next() {
                None => {
                    return Err(RexxError::new(
                        ErrorKind::Syntax,
                        "unterminated string literal",
                        SourceLocation::new(start_line, String::new(), self.filename.clone()),
                    ))
                }
                Some(c) if c == quote => {
                    if self.chars.peek() == Some(&quote) {
                        // doubled-quote escape
                        self.chars.next();
                        value.push(quote);
                    } else {
                        break;
                    }
                }
                Some('\n') => {
                    self.line += 1;
                    value.push('\n');
                }
                Some(c) => value.push(c),
            }
        }

        self.tokens
            .push(Token::new(TokenKind::String, value, start_line));
        Ok(())
    }

    fn lex_number(&mut self) -> Result<(), RexxError> {
        let start_line = self.line;
        let mut text = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if self.chars.peek() == Some(&'.') {
            // only consume the dot as a decimal point if a digit follows;
            // otherwise it is the start of a clause-ending `.` or unrelated token.
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some(c) if c.is_ascii_digit()) {
                text.push('.');
                self.chars.next();
                while let Some(&c) = self.chars.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
            }
        }

        if text.is_empty() || text.parse::<f64>().is_err() {
            return Err(self.error(format!("failed to lex numeric literal '{text}'")));
        }

        self.tokens
            .push(Token::new(TokenKind::Number, text, start_line));
        Ok(())
    }

    fn lex_ident(&mut self) {
        let start_line = self.line;
        let mut text = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.chars.next();
            } else if c == '.' {
                // a dot only continues the identifier (compound symbol
                // tail) if followed by another identifier character.
                let mut lookahead = self.chars.clone();
                lookahead.next();
                match lookahead.peek() {
                    Some(c2) if c2.is_alphanumeric() || *c2 == '_' => {
                        text.push('.');
                        self.chars.next();
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Ident, text, start_line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src, 1, "test.rexx").lex().expect("lex should succeed")
    }

    #[test]
    fn lexes_compound_identifier_as_single_token() {
        let tokens = lex("data.user.name");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "data.user.name");
    }

    #[test]
    fn lexes_double_pipe_before_single_pipe() {
        let tokens = lex("a||b");
        assert_eq!(tokens[1].lexeme, "||");
    }

    #[test]
    fn lexes_slash_as_division_when_not_comment() {
        let tokens = lex("a / b");
        assert!(tokens.iter().any(|t| t.lexeme == "/"));
    }

    #[test]
    fn block_comment_spans_lines() {
        let tokens = lex("a /* line one\nline two */ b");
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .collect();
        assert_eq!(idents.len(), 2);
        assert_eq!(idents[1].line, 2);
    }

    #[test]
    fn unterminated_comment_is_a_syntax_error() {
        let err = Lexer::new("/* never closed", 1, "f").lex().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn doubled_quote_escapes_inside_string() {
        let tokens = lex("'it''s'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "it's");
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        let err = Lexer::new("'unterminated", 1, "f").lex().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }
}
