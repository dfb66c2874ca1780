//! Clause and expression AST, plus the recursive-descent parser that
//! builds it from a token stream. See `spec.md` §3–§4.2.

pub mod do_clause;
pub mod expr;
pub mod if_clause;
pub mod parser;
pub mod select_clause;
pub mod simple_clauses;

use crate::error::RexxError;
use crate::lexer::{Lexer, TokenKind};
use crate::symbol::Symbol;

pub use expr::{BinOpKind, Expr, ExprKind, UnOpKind};
pub use loop_spec::LoopSpec;
pub use parser::{ParseResult, TokenParser};

mod loop_spec;

#[derive(Debug, Clone, PartialEq)]
pub enum ClauseKind {
    Assign {
        target: Symbol,
        expr: Expr,
    },
    Say {
        expr: Option<Expr>,
    },
    If {
        cond: Expr,
        then_body: Vec<Clause>,
        else_body: Vec<Clause>,
    },
    Do {
        spec: LoopSpec,
        body: Vec<Clause>,
        label: Option<String>,
    },
    Select {
        arms: Vec<(Expr, Vec<Clause>)>,
        otherwise: Vec<Clause>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        result_var: Option<Symbol>,
    },
    Return {
        expr: Option<Expr>,
    },
    Signal {
        label: String,
    },
    Address {
        target: String,
    },
    Require {
        path: String,
    },
    /// `LEAVE`/`ITERATE`, optionally scoped to a labelled `DO`.
    Leave {
        label: Option<String>,
    },
    Iterate {
        label: Option<String>,
    },
    /// The open-world catch-all: a clause that matched no keyword
    /// form, forwarded verbatim to the current ADDRESS target.
    Command {
        raw: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub line: usize,
    pub kind: ClauseKind,
}

impl Clause {
    pub fn new(line: usize, kind: ClauseKind) -> Self {
        Self { line, kind }
    }
}

/// Lex and parse a full program into its clause list.
pub fn parse_program(source: &str, filename: &str) -> Result<Vec<Clause>, RexxError> {
    let tokens = Lexer::new(source, 1, filename).lex()?;
    let mut parser = TokenParser::new(tokens, filename);
    parse_clauses(&mut parser, &[])
}

/// Parse clauses until EOF or until one of the given upper-cased
/// keyword terminators is seen as the next significant token (used by
/// block bodies: `END`, `ELSE`, `WHEN`, `OTHERWISE`).
pub fn parse_clauses(parser: &mut TokenParser, terminators: &[&str]) -> ParseResult<Vec<Clause>> {
    let mut clauses = Vec::new();
    parser.skip_separators();

    while !parser.is_eof() {
        if terminators.iter().any(|t| parser.check_ident(t)) {
            break;
        }
        clauses.push(parse_clause(parser)?);
        parser.skip_separators();
    }

    Ok(clauses)
}

/// Dispatch on the first significant token of a clause (`spec.md` §4.2).
pub fn parse_clause(parser: &mut TokenParser) -> ParseResult<Clause> {
    let line = parser.current_line();

    if parser.check_ident("LET") {
        return simple_clauses::parse_let(parser, line);
    }
    if parser.check_ident("SAY") {
        return simple_clauses::parse_say(parser, line);
    }
    if parser.check_ident("IF") {
        return if_clause::parse_if(parser, line);
    }
    if parser.check_ident("DO") {
        return do_clause::parse_do(parser, line, None);
    }
    if parser.check_ident("SELECT") {
        return select_clause::parse_select(parser, line);
    }
    if parser.check_ident("CALL") {
        return simple_clauses::parse_call(parser, line);
    }
    if parser.check_ident("RETURN") {
        return simple_clauses::parse_return(parser, line);
    }
    if parser.check_ident("SIGNAL") {
        return simple_clauses::parse_signal(parser, line);
    }
    if parser.check_ident("ADDRESS") {
        return simple_clauses::parse_address(parser, line);
    }
    if parser.check_ident("REQUIRE") {
        return simple_clauses::parse_require(parser, line);
    }
    if parser.check_ident("LEAVE") {
        return simple_clauses::parse_leave(parser, line);
    }
    if parser.check_ident("ITERATE") {
        return simple_clauses::parse_iterate(parser, line);
    }

    // labelled DO: `loopname: DO ...`
    if parser.check_kind(TokenKind::Ident)
        && parser.peek_at(1).kind == TokenKind::Op
        && parser.peek_at(1).lexeme == ":"
    {
        let label = parser.advance().lexeme;
        parser.advance(); // ':'
        if parser.check_ident("DO") {
            return do_clause::parse_do(parser, line, Some(label));
        }
        return Err(parser.error(format!("expected 'DO' after label '{label}:'")));
    }

    // bare-identifier assignment: `<ident> = <expr>`, only when the
    // next token actually is `=` (otherwise this falls through to the
    // command catch-all).
    if parser.check_kind(TokenKind::Ident)
        && parser.peek_at(1).kind == TokenKind::Op
        && parser.peek_at(1).lexeme == "="
    {
        let target = Symbol::parse(&parser.advance().lexeme);
        parser.advance(); // '='
        let expr = expr::parse_expr(parser)?;
        return Ok(Clause::new(line, ClauseKind::Assign { target, expr }));
    }

    simple_clauses::parse_command(parser, line)
}
