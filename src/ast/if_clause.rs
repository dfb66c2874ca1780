//! `IF <expr> THEN <clause-or-block> [ELSE <clause-or-block>] ENDIF`.
//! See `spec.md` §4.2.

use crate::ast::expr::parse_expr;
use crate::ast::parser::{ParseResult, TokenParser};
use crate::ast::{parse_clause, parse_clauses, Clause, ClauseKind};

/// Parse either a `DO ... END` block or a single clause: once `DO`
/// follows `THEN`/`ELSE`, parse a block; otherwise parse one clause.
fn parse_branch(parser: &mut TokenParser) -> ParseResult<Vec<Clause>> {
    parser.skip_separators();

    if parser.check_ident("DO") {
        parser.advance();
        parser.skip_separators();
        let body = parse_clauses(parser, &["END"])?;
        parser.expect_ident("END")?;
        Ok(body)
    } else {
        Ok(vec![parse_clause(parser)?])
    }
}

pub fn parse_if(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("IF")?;
    let cond = parse_expr(parser)?;
    parser.skip_separators();
    parser.expect_ident("THEN")?;

    let then_body = parse_branch(parser)?;

    parser.skip_separators();
    let else_body = if parser.eat_ident("ELSE") {
        parse_branch(parser)?
    } else {
        Vec::new()
    };

    parser.skip_separators();
    parser.expect_ident("ENDIF")?;

    Ok(Clause::new(
        line,
        ClauseKind::If {
            cond,
            then_body,
            else_body,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_program;

    #[test]
    fn single_statement_then_and_else() {
        let clauses =
            parse_program("IF x > 5 THEN ; SAY \"big\" ; ENDIF", "t").expect("should parse");
        assert_eq!(clauses.len(), 1);
        let ClauseKind::If { then_body, else_body, .. } = &clauses[0].kind else {
            panic!("expected If clause");
        };
        assert_eq!(then_body.len(), 1);
        assert!(else_body.is_empty());
    }

    #[test]
    fn block_then_and_else() {
        let src = "IF x > 5 THEN DO\nSAY \"a\"\nSAY \"b\"\nEND ELSE DO\nSAY \"c\"\nEND ENDIF";
        let clauses = parse_program(src, "t").expect("should parse");
        let ClauseKind::If { then_body, else_body, .. } = &clauses[0].kind else {
            panic!("expected If clause");
        };
        assert_eq!(then_body.len(), 2);
        assert_eq!(else_body.len(), 1);
    }
}
