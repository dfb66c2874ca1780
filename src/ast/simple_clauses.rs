//! The keyword clauses with no nested block body: `LET`/bare
//! assignment, `SAY`, `CALL`, `RETURN`, `SIGNAL`, `ADDRESS`,
//! `REQUIRE`, `LEAVE`, `ITERATE`, and the `Command` catch-all.
//! See `spec.md` §4.2.

use crate::ast::expr::{parse_expr, Expr};
use crate::ast::parser::{ParseResult, TokenParser};
use crate::ast::{Clause, ClauseKind};
use crate::lexer::TokenKind;
use crate::symbol::Symbol;

fn at_clause_end(parser: &TokenParser) -> bool {
    matches!(
        parser.peek().kind,
        TokenKind::Newline | TokenKind::Semi | TokenKind::Eof
    ) || parser.check_ident("END")
        || parser.check_ident("ELSE")
        || parser.check_ident("ENDIF")
        || parser.check_ident("WHEN")
        || parser.check_ident("OTHERWISE")
}

fn optional_expr(parser: &mut TokenParser) -> ParseResult<Option<Expr>> {
    if at_clause_end(parser) {
        Ok(None)
    } else {
        Ok(Some(parse_expr(parser)?))
    }
}

pub fn parse_let(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("LET")?;
    let target = parser.expect_kind(TokenKind::Ident, "an identifier")?;
    let target = Symbol::parse(&target.lexeme);
    if !parser.eat_op("=") {
        return Err(parser.error("expected '=' after LET target"));
    }
    let expr = parse_expr(parser)?;
    Ok(Clause::new(line, ClauseKind::Assign { target, expr }))
}

pub fn parse_say(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("SAY")?;
    let expr = optional_expr(parser)?;
    Ok(Clause::new(line, ClauseKind::Say { expr }))
}

pub fn parse_call(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("CALL")?;
    let name = parser.expect_kind(TokenKind::Ident, "a procedure or function name")?;

    let mut args = Vec::new();
    if parser.check_kind(TokenKind::LParen) {
        parser.advance();
        if !parser.check_kind(TokenKind::RParen) {
            loop {
                args.push(parse_expr(parser)?);
                if parser.check_kind(TokenKind::Comma) {
                    parser.advance();
                    continue;
                }
                break;
            }
        }
        parser.expect_kind(TokenKind::RParen, "')'")?;
    }

    let result_var = if parser.check_op("\u{2192}") {
        parser.advance();
        let var = parser.expect_kind(TokenKind::Ident, "a variable name")?;
        Some(Symbol::parse(&var.lexeme))
    } else {
        None
    };

    Ok(Clause::new(
        line,
        ClauseKind::Call {
            name: name.upper(),
            args,
            result_var,
        },
    ))
}

pub fn parse_return(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("RETURN")?;
    let expr = optional_expr(parser)?;
    Ok(Clause::new(line, ClauseKind::Return { expr }))
}

pub fn parse_signal(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("SIGNAL")?;
    let label = parser.expect_kind(TokenKind::Ident, "a label name")?;
    Ok(Clause::new(
        line,
        ClauseKind::Signal {
            label: label.upper(),
        },
    ))
}

pub fn parse_address(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("ADDRESS")?;
    let target = parser.expect_kind(TokenKind::Ident, "an ADDRESS target name")?;
    Ok(Clause::new(
        line,
        ClauseKind::Address {
            target: target.upper(),
        },
    ))
}

pub fn parse_require(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("REQUIRE")?;
    let path = if parser.check_kind(TokenKind::String) {
        parser.advance().lexeme
    } else {
        parser.expect_kind(TokenKind::Ident, "a module path")?.lexeme
    };
    Ok(Clause::new(line, ClauseKind::Require { path }))
}

fn optional_label(parser: &mut TokenParser) -> Option<String> {
    if parser.check_kind(TokenKind::Ident) && !at_clause_end(parser) {
        Some(parser.advance().upper())
    } else {
        None
    }
}

pub fn parse_leave(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("LEAVE")?;
    let label = optional_label(parser);
    Ok(Clause::new(line, ClauseKind::Leave { label }))
}

pub fn parse_iterate(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("ITERATE")?;
    let label = optional_label(parser);
    Ok(Clause::new(line, ClauseKind::Iterate { label }))
}

/// The catch-all: reconstruct the clause's source text from its
/// tokens (re-quoting string literals) and hand it to the ADDRESS
/// target unparsed. There is no byte span on `Token` to reconstruct
/// exact original whitespace from, so punctuation that must stay glued
/// to its neighbor — `{name}` interpolation, `(args)`, `a.b`, `f(x),y` —
/// is joined without a space and everything else gets one. See
/// `spec.md` §4.2, §4.5, §9 ("The Command catch-all").
pub fn parse_command(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    let mut raw = String::new();
    let mut glue_next = true;

    while !at_clause_end(parser) {
        let tok = parser.advance();
        let text = match tok.kind {
            TokenKind::String => format!("'{}'", tok.lexeme.replace('\'', "''")),
            TokenKind::Dot => ".".to_owned(),
            TokenKind::Comma => ",".to_owned(),
            _ => tok.lexeme,
        };

        let glue_before = matches!(text.as_str(), "}" | ")" | ",") || glue_next;
        if !raw.is_empty() && !glue_before {
            raw.push(' ');
        }
        raw.push_str(&text);
        glue_next = matches!(text.as_str(), "{" | "(" | ".");
    }

    if raw.is_empty() {
        return Err(parser.error("expected a clause"));
    }

    Ok(Clause::new(line, ClauseKind::Command { raw }))
}
