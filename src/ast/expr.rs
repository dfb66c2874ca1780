//! Expression AST nodes and the precedence-climbing expression parser.
//! See `spec.md` §3 ("Expression node") and §4.3 (precedence table).

use crate::ast::parser::{ParseResult, TokenParser};
use crate::lexer::TokenKind;
use crate::symbol::Symbol;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Pow,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOpKind {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    Var(Symbol),
    Compound(Symbol),
    BinOp(BinOpKind, Box<Expr>, Box<Expr>),
    UnOp(UnOpKind, Box<Expr>),
    Concat(Box<Expr>, Box<Expr>),
    Abuttal(Box<Expr>, Box<Expr>),
    FuncCall(String, Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub line: usize,
    pub kind: ExprKind,
}

impl Expr {
    fn new(line: usize, kind: ExprKind) -> Self {
        Self { line, kind }
    }
}

/// Precedence level, highest binds tightest, following `spec.md`
/// §4.3: `**` > `* / %` > `+ -` > concat (`||`/abuttal) > relational >
/// `&` > `|`. Unary `+ - \` binds tighter than `**` and is handled as
/// a dedicated prefix production.
fn binop_precedence(kind: BinOpKind) -> u8 {
    match kind {
        BinOpKind::Pow => 6,
        BinOpKind::Mul | BinOpKind::Div | BinOpKind::IntDiv => 5,
        BinOpKind::Add | BinOpKind::Sub => 4,
        BinOpKind::Eq | BinOpKind::Ne | BinOpKind::Gt | BinOpKind::Lt | BinOpKind::Ge | BinOpKind::Le => 2,
        BinOpKind::And => 1,
        BinOpKind::Or => 0,
    }
}

const CONCAT_PRECEDENCE: u8 = 3;

enum Operator {
    Bin(BinOpKind),
    Concat,
    Abuttal,
}

fn lookup_binop(lexeme: &str) -> Option<BinOpKind> {
    Some(match lexeme {
        "+" => BinOpKind::Add,
        "-" => BinOpKind::Sub,
        "*" => BinOpKind::Mul,
        "/" => BinOpKind::Div,
        "%" => BinOpKind::IntDiv,
        "=" | "==" => BinOpKind::Eq,
        "<>" | "><" | "\\=" => BinOpKind::Ne,
        ">" => BinOpKind::Gt,
        "<" => BinOpKind::Lt,
        ">=" | "\\<" => BinOpKind::Ge,
        "<=" | "\\>" => BinOpKind::Le,
        "&" | "&&" => BinOpKind::And,
        "|" => BinOpKind::Or,
        _ => return None,
    })
}

/// Peek the next infix operator (explicit token or implicit abuttal)
/// along with its precedence, without consuming anything.
fn peek_operator(parser: &TokenParser) -> Option<(Operator, u8)> {
    if parser.check_op("||") {
        return Some((Operator::Concat, CONCAT_PRECEDENCE));
    }
    if parser.peek().kind == TokenKind::Op {
        if let Some(op) = lookup_binop(&parser.peek().lexeme) {
            return Some((Operator::Bin(op), binop_precedence(op)));
        }
    }
    if starts_abuttal_operand(parser) {
        return Some((Operator::Abuttal, CONCAT_PRECEDENCE));
    }
    None
}

/// Reserved words that end an expression rather than extend it by
/// abuttal: every keyword a clause/block parser expects to `eat_ident`
/// or `expect_ident` right after an expression (`TO`, `BY`, `THEN`, …).
/// Without this exclusion, `DO i = 1 TO 3` would have its `start` expr
/// greedily swallow `TO 3` as an implicit-concat operand, since a bare
/// `Ident` token looks identical to any other variable reference.
const KEYWORDS: &[&str] = &[
    "LET", "SAY", "IF", "THEN", "ELSE", "ENDIF", "DO", "WHILE", "TO", "BY", "OVER", "END",
    "SELECT", "WHEN", "OTHERWISE", "CALL", "RETURN", "SIGNAL", "ADDRESS", "REQUIRE", "LEAVE",
    "ITERATE",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// An operand can be glued directly onto a preceding one (abuttal
/// concatenation) only when it starts with a literal, non-keyword
/// identifier, or parenthesized sub-expression — i.e. when no
/// recognized operator token, and no clause-structuring keyword,
/// separates them.
fn starts_abuttal_operand(parser: &TokenParser) -> bool {
    match parser.peek().kind {
        TokenKind::Ident => !is_keyword(&parser.peek().lexeme),
        TokenKind::Number | TokenKind::String | TokenKind::LParen => true,
        _ => false,
    }
}

pub fn parse_expr(parser: &mut TokenParser) -> ParseResult<Expr> {
    parse_binary(parser, 0)
}

fn parse_binary(parser: &mut TokenParser, min_precedence: u8) -> ParseResult<Expr> {
    let mut lhs = parse_power(parser)?;

    loop {
        let Some((op, prec)) = peek_operator(parser) else { break };
        if prec < min_precedence {
            break;
        }
        let line = parser.current_line();
        let kind = match op {
            Operator::Bin(b) => {
                parser.advance();
                let rhs = parse_binary(parser, prec + 1)?;
                ExprKind::BinOp(b, Box::new(lhs), Box::new(rhs))
            }
            Operator::Concat => {
                parser.advance();
                let rhs = parse_binary(parser, prec + 1)?;
                ExprKind::Concat(Box::new(lhs), Box::new(rhs))
            }
            Operator::Abuttal => {
                let rhs = parse_binary(parser, prec + 1)?;
                ExprKind::Abuttal(Box::new(lhs), Box::new(rhs))
            }
        };
        lhs = Expr::new(line, kind);
    }

    Ok(lhs)
}

/// Unary `+ - \` binds to the immediate primary only, never to a `**`
/// chain above it: `spec.md` §4.3 lists unary as binding *tighter* than
/// `**`, so `-2**2` must parse as `(-2)**2` (REXX's prefix-outranks-`**`
/// quirk), not `-(2**2)`. Recurses into itself (not `parse_power`) so a
/// run of prefixes (`- - x`) still nests correctly without reaching for
/// `**`.
fn parse_unary(parser: &mut TokenParser) -> ParseResult<Expr> {
    if parser.peek().kind == TokenKind::Op {
        let op = match parser.peek().lexeme.as_str() {
            "+" => Some(UnOpKind::Plus),
            "-" => Some(UnOpKind::Minus),
            "\\" => Some(UnOpKind::Not),
            _ => None,
        };
        if let Some(op) = op {
            let line = parser.current_line();
            parser.advance();
            let operand = parse_unary(parser)?;
            return Ok(Expr::new(line, ExprKind::UnOp(op, Box::new(operand))));
        }
    }
    parse_primary(parser)
}

/// `**` is right-associative, per `spec.md` §4.3. Its base and its
/// exponent are each parsed through `parse_unary`, so a prefix on
/// either side (`-2**2`, `2**-2`) attaches to that side alone rather
/// than to the whole power expression.
fn parse_power(parser: &mut TokenParser) -> ParseResult<Expr> {
    let base = parse_unary(parser)?;
    if parser.check_op("**") {
        let line = parser.current_line();
        parser.advance();
        let exponent = parse_power(parser)?;
        return Ok(Expr::new(
            line,
            ExprKind::BinOp(BinOpKind::Pow, Box::new(base), Box::new(exponent)),
        ));
    }
    Ok(base)
}

fn parse_primary(parser: &mut TokenParser) -> ParseResult<Expr> {
    let line = parser.current_line();

    if parser.check_kind(TokenKind::LParen) {
        parser.advance();
        let inner = parse_expr(parser)?;
        parser.expect_kind(TokenKind::RParen, "')'")?;
        return Ok(inner);
    }

    if parser.check_kind(TokenKind::Number) {
        let tok = parser.advance();
        let n: f64 = tok
            .lexeme
            .parse()
            .map_err(|_| parser.error(format!("invalid numeric literal '{}'", tok.lexeme)))?;
        return Ok(Expr::new(line, ExprKind::Literal(Value::Number(n))));
    }

    if parser.check_kind(TokenKind::String) {
        let tok = parser.advance();
        return Ok(Expr::new(line, ExprKind::Literal(Value::Str(tok.lexeme))));
    }

    if parser.check_kind(TokenKind::Ident) {
        let tok = parser.advance();
        if parser.check_kind(TokenKind::LParen) {
            parser.advance();
            let mut args = Vec::new();
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
            return Ok(Expr::new(line, ExprKind::FuncCall(tok.upper(), args)));
        }

        let symbol = Symbol::parse(&tok.lexeme);
        if symbol.is_compound() {
            return Ok(Expr::new(line, ExprKind::Compound(symbol)));
        }
        return Ok(Expr::new(line, ExprKind::Var(symbol)));
    }

    Err(parser.error(format!(
        "expected an expression, found '{}'",
        parser.peek().lexeme
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Expr {
        let tokens = Lexer::new(src, 1, "t").lex().unwrap();
        let mut p = TokenParser::new(tokens, "t");
        parse_expr(&mut p).unwrap()
    }

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse("1 + 2 * 3");
        match expr.kind {
            ExprKind::BinOp(BinOpKind::Add, _, rhs) => {
                assert!(matches!(rhs.kind, ExprKind::BinOp(BinOpKind::Mul, ..)));
            }
            _ => panic!("expected Add at top level"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ** 3 ** 2 should parse as 2 ** (3 ** 2)
        let expr = parse("2 ** 3 ** 2");
        match expr.kind {
            ExprKind::BinOp(BinOpKind::Pow, lhs, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::Literal(Value::Number(n)) if n == 2.0));
                assert!(matches!(rhs.kind, ExprKind::BinOp(BinOpKind::Pow, ..)));
            }
            _ => panic!("expected Pow at top level"),
        }
    }

    #[test]
    fn unary_minus_outranks_power() {
        // `-2**2` must parse as `(-2)**2`, not `-(2**2)`: unary binds
        // tighter than `**` (`spec.md` §4.3's precedence list puts
        // unary `+ - \` above `**`).
        let expr = parse("-2**2");
        match expr.kind {
            ExprKind::BinOp(BinOpKind::Pow, lhs, rhs) => {
                assert!(matches!(lhs.kind, ExprKind::UnOp(UnOpKind::Minus, ..)));
                assert!(matches!(rhs.kind, ExprKind::Literal(Value::Number(n)) if n == 2.0));
            }
            _ => panic!("expected Pow at top level, wrapping a unary-negated base"),
        }
    }

    #[test]
    fn explicit_concat() {
        let expr = parse("\"a\" || \"b\"");
        assert!(matches!(expr.kind, ExprKind::Concat(..)));
    }

    #[test]
    fn abuttal_concat_binds_looser_than_addition() {
        // `1 + 1`a` should read as (1 + 1) abutted with `a` since abuttal
        // sits at the concat precedence tier, below `+`.
        let expr = parse("x 1+1");
        assert!(matches!(expr.kind, ExprKind::Abuttal(..)));
    }

    #[test]
    fn function_call_with_args() {
        let expr = parse("UPPER(x, 1)");
        match expr.kind {
            ExprKind::FuncCall(name, args) => {
                assert_eq!(name, "UPPER");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected FuncCall"),
        }
    }

    #[test]
    fn keyword_following_an_expression_does_not_get_swallowed_by_abuttal() {
        // `1 TO 3` must stop after `1` so that a `DO i = 1 TO 3` header
        // can still consume `TO` itself; it must not read as `1` abutted
        // with a variable reference named `TO`.
        let tokens = Lexer::new("1 TO 3", 1, "t").lex().unwrap();
        let mut p = TokenParser::new(tokens, "t");
        let expr = parse_expr(&mut p).unwrap();
        assert!(matches!(expr.kind, ExprKind::Literal(Value::Number(n)) if n == 1.0));
        assert!(p.check_ident("TO"));
    }

    #[test]
    fn relational_looser_than_concat() {
        let expr = parse("a || b > c");
        assert!(matches!(expr.kind, ExprKind::BinOp(BinOpKind::Gt, ..)));
    }
}
