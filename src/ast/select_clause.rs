//! `SELECT ; WHEN <expr> THEN <clauses>* ; [OTHERWISE <clauses>] ; END`.
//! See `spec.md` §4.2, §4.5.

use crate::ast::expr::parse_expr;
use crate::ast::parser::{ParseResult, TokenParser};
use crate::ast::{parse_clauses, Clause, ClauseKind};

pub fn parse_select(parser: &mut TokenParser, line: usize) -> ParseResult<Clause> {
    parser.expect_ident("SELECT")?;
    parser.skip_separators();

    let mut arms = Vec::new();
    while parser.eat_ident("WHEN") {
        let cond = parse_expr(parser)?;
        parser.skip_separators();
        parser.expect_ident("THEN")?;
        parser.skip_separators();
        let body = parse_clauses(parser, &["WHEN", "OTHERWISE", "END"])?;
        arms.push((cond, body));
        parser.skip_separators();
    }

    let otherwise = if parser.eat_ident("OTHERWISE") {
        parser.skip_separators();
        parse_clauses(parser, &["END"])?
    } else {
        Vec::new()
    };

    parser.skip_separators();
    parser.expect_ident("END")?;

    Ok(Clause::new(line, ClauseKind::Select { arms, otherwise }))
}

#[cfg(test)]
mod tests {
    use crate::ast::{parse_program, ClauseKind};

    #[test]
    fn select_with_otherwise() {
        let src = "SELECT\nWHEN x = 1 THEN\nSAY \"one\"\nWHEN x = 2 THEN\nSAY \"two\"\nOTHERWISE\nSAY \"other\"\nEND";
        let clauses = parse_program(src, "t").expect("should parse");
        let ClauseKind::Select { arms, otherwise } = &clauses[0].kind else {
            panic!("expected Select clause");
        };
        assert_eq!(arms.len(), 2);
        assert_eq!(otherwise.len(), 1);
    }

    #[test]
    fn select_without_otherwise() {
        let src = "SELECT\nWHEN x = 1 THEN\nSAY \"one\"\nEND";
        let clauses = parse_program(src, "t").expect("should parse");
        let ClauseKind::Select { arms, otherwise } = &clauses[0].kind else {
            panic!("expected Select clause");
        };
        assert_eq!(arms.len(), 1);
        assert!(otherwise.is_empty());
    }
}
