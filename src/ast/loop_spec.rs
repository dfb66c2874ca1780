//! `DO` loop header variants. See `spec.md` §3 ("LoopSpec") and §4.5.

use crate::ast::expr::Expr;
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub enum LoopSpec {
    Range {
        var: Symbol,
        start: Expr,
        end: Expr,
    },
    RangeStep {
        var: Symbol,
        start: Expr,
        end: Expr,
        step: Expr,
    },
    While {
        cond: Expr,
    },
    Repeat {
        count: Expr,
    },
    Over {
        var: Symbol,
        collection: Expr,
    },
    /// Parsed but always rejected at execution (`spec.md` §4.2): a
    /// bare `DO` with no header is a safety error, not a parse error.
    Infinite,
}
