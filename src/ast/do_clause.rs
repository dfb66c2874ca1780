//! `DO` loop header disambiguation and body parsing. See `spec.md`
//! §4.2: the five `LoopSpec` variants are told apart purely by
//! look-ahead after the `DO` keyword.

use crate::ast::expr::parse_expr;
use crate::ast::loop_spec::LoopSpec;
use crate::ast::parser::{ParseResult, TokenParser};
use crate::ast::{parse_clauses, Clause, ClauseKind};
use crate::lexer::TokenKind;
use crate::symbol::Symbol;

fn at_header_end(parser: &TokenParser) -> bool {
    matches!(parser.peek().kind, TokenKind::Newline | TokenKind::Semi | TokenKind::Eof)
}

fn parse_loop_spec(parser: &mut TokenParser) -> ParseResult<LoopSpec> {
    if parser.eat_ident("WHILE") {
        let cond = parse_expr(parser)?;
        return Ok(LoopSpec::While { cond });
    }

    if parser.check_kind(TokenKind::Ident) {
        let is_range = parser.peek_at(1).kind == TokenKind::Op && parser.peek_at(1).lexeme == "=";
        let is_over = parser.peek_at(1).is_ident_upper("OVER");

        if is_range {
            let var = Symbol::parse(&parser.advance().lexeme);
            parser.advance(); // '='
            let start = parse_expr(parser)?;
            parser.expect_ident("TO")?;
            let end = parse_expr(parser)?;
            if parser.eat_ident("BY") {
                let step = parse_expr(parser)?;
                return Ok(LoopSpec::RangeStep { var, start, end, step });
            }
            return Ok(LoopSpec::Range { var, start, end });
        }

        if is_over {
            let var = Symbol::parse(&parser.advance().lexeme);
            parser.expect_ident("OVER")?;
            let collection = parse_expr(parser)?;
            return Ok(LoopSpec::Over { var, collection });
        }
    }

    if at_header_end(parser) {
        return Ok(LoopSpec::Infinite);
    }

    let count = parse_expr(parser)?;
    Ok(LoopSpec::Repeat { count })
}

pub fn parse_do(parser: &mut TokenParser, line: usize, label: Option<String>) -> ParseResult<Clause> {
    parser.expect_ident("DO")?;
    let spec = parse_loop_spec(parser)?;
    parser.skip_separators();
    let body = parse_clauses(parser, &["END"])?;
    parser.expect_ident("END")?;

    Ok(Clause::new(line, ClauseKind::Do { spec, body, label }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{parse_program, ClauseKind};

    fn do_spec(src: &str) -> LoopSpec {
        let clauses = parse_program(src, "t").expect("should parse");
        let ClauseKind::Do { spec, .. } = clauses.into_iter().next().unwrap().kind else {
            panic!("expected Do clause");
        };
        spec
    }

    #[test]
    fn range_without_step() {
        assert!(matches!(do_spec("DO i = 1 TO 3\nEND"), LoopSpec::Range { .. }));
    }

    #[test]
    fn range_with_step() {
        assert!(matches!(
            do_spec("DO i = 1 TO 10 BY 2\nEND"),
            LoopSpec::RangeStep { .. }
        ));
    }

    #[test]
    fn while_loop() {
        assert!(matches!(do_spec("DO WHILE x < 10\nEND"), LoopSpec::While { .. }));
    }

    #[test]
    fn over_loop() {
        assert!(matches!(do_spec("DO c OVER \"abc\"\nEND"), LoopSpec::Over { .. }));
    }

    #[test]
    fn repeat_loop() {
        assert!(matches!(do_spec("DO 5\nEND"), LoopSpec::Repeat { .. }));
    }

    #[test]
    fn infinite_loop_parses() {
        assert!(matches!(do_spec("DO\nEND"), LoopSpec::Infinite));
    }
}
