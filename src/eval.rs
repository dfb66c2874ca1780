//! The expression evaluator: turns an `Expr` into a `Value` under a
//! `VariableStore` and a `FunctionRegistry`. See `spec.md` §4.3.

use crate::ast::{BinOpKind, Expr, ExprKind, UnOpKind};
use crate::error::{RexxError, SourceLocation};
use crate::registry::FunctionRegistry;
use crate::symbol::Symbol;
use crate::value::Value;
use crate::vars::VariableStore;

fn loc(expr: &Expr, filename: &str) -> SourceLocation {
    SourceLocation::new(expr.line, String::new(), filename)
}

/// An unresolved symbol defaults to its own name (`spec.md` §4.3 rule
/// 4): a flat symbol defaults to the name as the source wrote it; an
/// unresolved compound tail defaults to its upper-cased dotted form,
/// since the tail segments are themselves lookup-normalized.
fn default_to_name(symbol: &Symbol) -> Value {
    if symbol.is_compound() {
        Value::str(symbol.dotted_upper())
    } else {
        Value::str(symbol.original.clone())
    }
}

pub fn evaluate(
    expr: &Expr,
    vars: &VariableStore,
    registry: &dyn FunctionRegistry,
    filename: &str,
) -> Result<Value, RexxError> {
    match &expr.kind {
        ExprKind::Literal(value) => Ok(value.clone()),

        ExprKind::Var(symbol) | ExprKind::Compound(symbol) => {
            Ok(vars.get(symbol).unwrap_or_else(|| default_to_name(symbol)))
        }

        ExprKind::UnOp(op, operand) => {
            let value = evaluate(operand, vars, registry, filename)?;
            let location = loc(expr, filename);
            match op {
                UnOpKind::Plus => Ok(Value::Number(value.to_number(&location)?)),
                UnOpKind::Minus => Ok(Value::Number(-value.to_number(&location)?)),
                UnOpKind::Not => Ok(Value::bool(!value.truthy(&location)?)),
            }
        }

        ExprKind::BinOp(op, lhs, rhs) => {
            let location = loc(expr, filename);
            eval_binop(*op, lhs, rhs, vars, registry, filename, &location)
        }

        ExprKind::Concat(lhs, rhs) => {
            let l = evaluate(lhs, vars, registry, filename)?;
            let r = evaluate(rhs, vars, registry, filename)?;
            Ok(Value::str(format!("{}{}", l.to_rexx_string(), r.to_rexx_string())))
        }

        ExprKind::Abuttal(lhs, rhs) => {
            let l = evaluate(lhs, vars, registry, filename)?;
            let r = evaluate(rhs, vars, registry, filename)?;
            Ok(Value::str(format!("{}{}", l.to_rexx_string(), r.to_rexx_string())))
        }

        ExprKind::FuncCall(name, arg_exprs) => {
            let mut args = Vec::with_capacity(arg_exprs.len());
            for arg in arg_exprs {
                args.push(evaluate(arg, vars, registry, filename)?);
            }
            let location = loc(expr, filename);
            registry.call(name, &args, &location)
        }
    }
}

fn eval_binop(
    op: BinOpKind,
    lhs: &Expr,
    rhs: &Expr,
    vars: &VariableStore,
    registry: &dyn FunctionRegistry,
    filename: &str,
    location: &SourceLocation,
) -> Result<Value, RexxError> {
    // `&`/`|` are logical, not arithmetic: both sides are truthy-coerced
    // before combining.
    if matches!(op, BinOpKind::And | BinOpKind::Or) {
        let l = evaluate(lhs, vars, registry, filename)?.truthy(location)?;
        let r = evaluate(rhs, vars, registry, filename)?.truthy(location)?;
        return Ok(Value::bool(match op {
            BinOpKind::And => l && r,
            BinOpKind::Or => l || r,
            _ => unreachable!(),
        }));
    }

    let l = evaluate(lhs, vars, registry, filename)?;
    let r = evaluate(rhs, vars, registry, filename)?;

    // Relational operators compare numerically when both sides parse as
    // numbers, falling back to string comparison otherwise.
    if matches!(
        op,
        BinOpKind::Eq | BinOpKind::Ne | BinOpKind::Gt | BinOpKind::Lt | BinOpKind::Ge | BinOpKind::Le
    ) {
        let ordering = match (l.to_number(location), r.to_number(location)) {
            (Ok(ln), Ok(rn)) => ln.partial_cmp(&rn),
            _ => l.to_rexx_string().partial_cmp(&r.to_rexx_string()),
        };
        let Some(ordering) = ordering else {
            return Ok(Value::bool(false));
        };
        use std::cmp::Ordering::*;
        let truth = match op {
            BinOpKind::Eq => ordering == Equal,
            BinOpKind::Ne => ordering != Equal,
            BinOpKind::Gt => ordering == Greater,
            BinOpKind::Lt => ordering == Less,
            BinOpKind::Ge => ordering != Less,
            BinOpKind::Le => ordering != Greater,
            _ => unreachable!(),
        };
        return Ok(Value::bool(truth));
    }

    let ln = l.to_number(location)?;
    let rn = r.to_number(location)?;
    match op {
        BinOpKind::Add => Ok(Value::Number(ln + rn)),
        BinOpKind::Sub => Ok(Value::Number(ln - rn)),
        BinOpKind::Mul => Ok(Value::Number(ln * rn)),
        BinOpKind::Div => {
            if rn == 0.0 {
                return Err(RexxError::arith("division by zero", location.clone()));
            }
            Ok(Value::Number(ln / rn))
        }
        BinOpKind::IntDiv => {
            if rn == 0.0 {
                return Err(RexxError::arith("division by zero", location.clone()));
            }
            Ok(Value::Number((ln / rn).trunc()))
        }
        BinOpKind::Pow => Ok(Value::Number(ln.powf(rn))),
        _ => unreachable!("relational and logical ops handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_program;
    use crate::registry::BuiltinRegistry;

    fn eval_str(src: &str, vars: &VariableStore) -> Value {
        let clauses = parse_program(src, "t").expect("should parse");
        let crate::ast::ClauseKind::Say { expr: Some(expr) } = &clauses[0].kind else {
            panic!("expected a SAY clause wrapping the expression");
        };
        evaluate(expr, vars, &BuiltinRegistry, "t").expect("should evaluate")
    }

    #[test]
    fn arithmetic_precedence() {
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY 1 + 2 * 3", &vars), Value::Number(7.0));
    }

    #[test]
    fn unary_minus_outranks_power() {
        // (-2)**2 = 4, not -(2**2) = -4.
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY -2**2", &vars), Value::Number(4.0));
    }

    #[test]
    fn division_by_zero_is_arith_error() {
        let vars = VariableStore::new();
        let clauses = parse_program("SAY 1 / 0", "t").unwrap();
        let crate::ast::ClauseKind::Say { expr: Some(expr) } = &clauses[0].kind else {
            panic!("expected SAY");
        };
        let err = evaluate(expr, &vars, &BuiltinRegistry, "t").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Arith);
    }

    #[test]
    fn relational_returns_rexx_boolean_strings() {
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY 3 > 2", &vars), Value::str("1"));
        assert_eq!(eval_str("SAY 3 < 2", &vars), Value::str("0"));
    }

    #[test]
    fn unresolved_flat_symbol_defaults_to_its_own_name() {
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY Foo", &vars), Value::str("Foo"));
    }

    #[test]
    fn unresolved_compound_tail_defaults_to_upper_dotted_name() {
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY foo.bar", &vars), Value::str("FOO.BAR"));
    }

    #[test]
    fn concatenation_always_yields_a_string() {
        let mut vars = VariableStore::new();
        vars.set(&Symbol::parse("x"), Value::Number(1.0));
        assert_eq!(eval_str("SAY x || 2", &vars), Value::str("12"));
    }

    #[test]
    fn builtin_function_call() {
        let vars = VariableStore::new();
        assert_eq!(eval_str("SAY UPPER(\"abc\")", &vars), Value::str("ABC"));
    }
}
