//! The control-flow executor: runs a clause list under a variable
//! store, a function registry, and an ADDRESS target. See `spec.md`
//! §4.5.

use log::debug;

use crate::address::AddressTarget;
use crate::ast::{Clause, ClauseKind, Expr, LoopSpec};
use crate::error::{ErrorKind, RexxError, SourceLocation};
use crate::eval::evaluate;
use crate::registry::FunctionRegistry;
use crate::symbol::Symbol;
use crate::value::Value;
use crate::vars::VariableStore;

/// The unwinding signal threaded back out of `exec_clauses`/`exec_clause`
/// by `RETURN`, `LEAVE`, and `ITERATE` (`spec.md` §4.5, GLOSSARY
/// "Termination record"). `SIGNAL` is not one of these: this AST has no
/// jump-addressable label table to unwind to, so a `SIGNAL` clause
/// raises a `Signal`-class `RexxError` directly instead (`spec.md` §7).
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Return(Value),
    Leave(Option<String>),
    Iterate(Option<String>),
}

const WHILE_ITERATION_CAP: u64 = 10_000;

pub struct ExecContext<'a> {
    pub vars: &'a mut VariableStore,
    pub registry: &'a dyn FunctionRegistry,
    pub address: &'a mut dyn AddressTarget,
    pub say: &'a mut dyn FnMut(&str),
    pub filename: &'a str,
}

fn loc(line: usize, filename: &str) -> SourceLocation {
    SourceLocation::new(line, String::new(), filename)
}

/// True when a `LEAVE`/`ITERATE` label targets the loop currently being
/// run: an absent label always targets the nearest enclosing loop.
fn targets_this_loop(target: &Option<String>, this_label: &Option<String>) -> bool {
    match target {
        None => true,
        Some(t) => this_label.as_deref() == Some(t.as_str()),
    }
}

/// Run a clause list sequentially, stopping at the first clause that
/// yields a termination.
pub fn exec_clauses(clauses: &[Clause], ctx: &mut ExecContext) -> Result<Option<Termination>, RexxError> {
    for clause in clauses {
        if let Some(term) = exec_clause(clause, ctx)? {
            return Ok(Some(term));
        }
    }
    Ok(None)
}

fn exec_clause(clause: &Clause, ctx: &mut ExecContext) -> Result<Option<Termination>, RexxError> {
    let location = loc(clause.line, ctx.filename);

    match &clause.kind {
        ClauseKind::Assign { target, expr } => {
            let value = evaluate(expr, ctx.vars, ctx.registry, ctx.filename)?;
            ctx.vars.set(target, value);
            Ok(None)
        }

        ClauseKind::Say { expr } => {
            let text = match expr {
                Some(expr) => evaluate(expr, ctx.vars, ctx.registry, ctx.filename)?.to_rexx_string(),
                None => String::new(),
            };
            (ctx.say)(&text);
            Ok(None)
        }

        ClauseKind::If { cond, then_body, else_body } => {
            let truth = evaluate(cond, ctx.vars, ctx.registry, ctx.filename)?.truthy(&location)?;
            if truth {
                exec_clauses(then_body, ctx)
            } else {
                exec_clauses(else_body, ctx)
            }
        }

        ClauseKind::Do { spec, body, label } => exec_do(spec, body, label, &location, ctx),

        ClauseKind::Select { arms, otherwise } => {
            for (cond, body) in arms {
                if evaluate(cond, ctx.vars, ctx.registry, ctx.filename)?.truthy(&location)? {
                    return exec_clauses(body, ctx);
                }
            }
            // no arm matched: silent completion, per spec.md §4.5.
            exec_clauses(otherwise, ctx)
        }

        ClauseKind::Call { name, args, result_var } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, ctx.vars, ctx.registry, ctx.filename)?);
            }
            let result = ctx.registry.call(name, &values, &location)?;
            if let Some(var) = result_var {
                ctx.vars.set(var, result);
            }
            Ok(None)
        }

        ClauseKind::Return { expr } => {
            let value = match expr {
                Some(expr) => evaluate(expr, ctx.vars, ctx.registry, ctx.filename)?,
                None => Value::Null,
            };
            Ok(Some(Termination::Return(value)))
        }

        ClauseKind::Signal { label } => Err(RexxError::new(
            ErrorKind::Signal,
            format!("target label '{label}' not found"),
            location.clone(),
        )),

        ClauseKind::Address { target } => {
            // Switching the active ADDRESS target is the shell's job
            // (it owns the concrete target instance); the executor only
            // records intent through the RESULT-free no-op here. Actual
            // target switching happens at the interpreter layer.
            debug!("ADDRESS clause seen for target '{target}' (handled by the interpreter shell)");
            Ok(None)
        }

        ClauseKind::Require { path } => {
            debug!("REQUIRE '{path}' (no module system in this core; recorded only)");
            Ok(None)
        }

        ClauseKind::Leave { label } => Ok(Some(Termination::Leave(label.clone()))),
        ClauseKind::Iterate { label } => Ok(Some(Termination::Iterate(label.clone()))),

        ClauseKind::Command { raw } => {
            let interpolated = interpolate(raw, ctx.vars);
            debug!("dispatching command clause: {interpolated}");
            let result = ctx.address.execute(&interpolated)?;
            ctx.vars.set(&Symbol::parse("RESULT"), result);
            Ok(None)
        }
    }
}

/// Replace every `{name}` placeholder in `raw` with the named variable's
/// canonical string form (default-to-name on absence), per `spec.md` §9.
fn interpolate(raw: &str, vars: &VariableStore) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        let mut closed = false;
        for c2 in chars.by_ref() {
            if c2 == '}' {
                closed = true;
                break;
            }
            name.push(c2);
        }
        if !closed {
            out.push('{');
            out.push_str(&name);
            continue;
        }
        let symbol = Symbol::parse(&name);
        let value = vars.get(&symbol).unwrap_or_else(|| {
            if symbol.is_compound() {
                Value::str(symbol.dotted_upper())
            } else {
                Value::str(symbol.original.clone())
            }
        });
        out.push_str(&value.to_rexx_string());
    }

    out
}

fn exec_do(
    spec: &LoopSpec,
    body: &[Clause],
    label: &Option<String>,
    location: &SourceLocation,
    ctx: &mut ExecContext,
) -> Result<Option<Termination>, RexxError> {
    debug!("entering DO loop{}", label.as_deref().map(|l| format!(" '{l}'")).unwrap_or_default());
    let result = match spec {
        LoopSpec::Range { var, start, end } => exec_range(var, start, end, None, body, label, location, ctx),
        LoopSpec::RangeStep { var, start, end, step } => {
            exec_range(var, start, end, Some(step), body, label, location, ctx)
        }
        LoopSpec::While { cond } => exec_while(cond, body, label, location, ctx),
        LoopSpec::Repeat { count } => exec_repeat(count, body, label, location, ctx),
        LoopSpec::Over { var, collection } => exec_over(var, collection, body, label, location, ctx),
        LoopSpec::Infinite => Err(RexxError::loop_err(
            "a bare DO with no loop header cannot be executed",
            location.clone(),
        )),
    };
    debug!("exiting DO loop{}", label.as_deref().map(|l| format!(" '{l}'")).unwrap_or_default());
    result
}

/// Outcome of running one loop-body iteration: whether the loop should
/// keep going, stop (consumed `LEAVE`), or propagate a termination to
/// the caller.
enum BodyOutcome {
    Continue,
    StopLoop,
    Propagate(Termination),
}

fn run_iteration(
    body: &[Clause],
    label: &Option<String>,
    ctx: &mut ExecContext,
) -> Result<BodyOutcome, RexxError> {
    match exec_clauses(body, ctx)? {
        None => Ok(BodyOutcome::Continue),
        Some(Termination::Leave(l)) if targets_this_loop(&l, label) => Ok(BodyOutcome::StopLoop),
        Some(Termination::Iterate(l)) if targets_this_loop(&l, label) => Ok(BodyOutcome::Continue),
        Some(other) => Ok(BodyOutcome::Propagate(other)),
    }
}

/// Capture the loop variable's prior binding before the loop starts, so
/// it can be restored afterward if one existed (`spec.md` §9,
/// "Loop-variable persistence").
fn capture_prior(var: &Symbol, ctx: &ExecContext) -> Option<Value> {
    ctx.vars.get_stem(&var.stem)
}

fn restore_prior(var: &Symbol, prior: Option<Value>, ctx: &mut ExecContext) {
    if let Some(value) = prior {
        ctx.vars.set(var, value);
    }
}

fn exec_range(
    var: &Symbol,
    start: &Expr,
    end: &Expr,
    step: Option<&Expr>,
    body: &[Clause],
    label: &Option<String>,
    location: &SourceLocation,
    ctx: &mut ExecContext,
) -> Result<Option<Termination>, RexxError> {
    let start_val = evaluate(start, ctx.vars, ctx.registry, ctx.filename)?.to_number(location)?;
    let end_val = evaluate(end, ctx.vars, ctx.registry, ctx.filename)?.to_number(location)?;
    let step_val = match step {
        Some(step_expr) => {
            let s = evaluate(step_expr, ctx.vars, ctx.registry, ctx.filename)?.to_number(location)?;
            if s == 0.0 {
                return Err(RexxError::loop_err("DO step cannot be zero", location.clone()));
            }
            if s.fract() != 0.0 || start_val.fract() != 0.0 || end_val.fract() != 0.0 {
                return Err(RexxError::loop_err(
                    "DO ... BY bounds and step must be integers",
                    location.clone(),
                ));
            }
            s
        }
        None => {
            if start_val <= end_val {
                1.0
            } else {
                -1.0
            }
        }
    };

    let prior = capture_prior(var, ctx);
    let mut i = start_val;
    let mut propagated = None;

    loop {
        let keep_going = if step_val > 0.0 { i <= end_val } else { i >= end_val };
        if !keep_going {
            // The loop var is incremented once more than the body ran and
            // that overshoot value is what persists (`spec.md` §8: "the
            // loop body runs with i = b, then i is incremented once
            // before the termination test fails, and that post-increment
            // value persists").
            ctx.vars.set(var, Value::Number(i));
            break;
        }
        ctx.vars.set(var, Value::Number(i));

        match run_iteration(body, label, ctx)? {
            BodyOutcome::Continue => {}
            BodyOutcome::StopLoop => break,
            BodyOutcome::Propagate(term) => {
                propagated = Some(term);
                break;
            }
        }

        i += step_val;
    }

    restore_prior(var, prior, ctx);
    Ok(propagated)
}

fn exec_while(
    cond: &Expr,
    body: &[Clause],
    label: &Option<String>,
    location: &SourceLocation,
    ctx: &mut ExecContext,
) -> Result<Option<Termination>, RexxError> {
    let mut iterations: u64 = 0;

    loop {
        if !evaluate(cond, ctx.vars, ctx.registry, ctx.filename)?.truthy(location)? {
            break;
        }
        iterations += 1;
        if iterations > WHILE_ITERATION_CAP {
            return Err(RexxError::loop_err(
                format!("DO WHILE exceeded the {WHILE_ITERATION_CAP}-iteration safety cap"),
                location.clone(),
            ));
        }

        match run_iteration(body, label, ctx)? {
            BodyOutcome::Continue => {}
            BodyOutcome::StopLoop => break,
            BodyOutcome::Propagate(term) => return Ok(Some(term)),
        }
    }

    Ok(None)
}

fn exec_repeat(
    count: &Expr,
    body: &[Clause],
    label: &Option<String>,
    location: &SourceLocation,
    ctx: &mut ExecContext,
) -> Result<Option<Termination>, RexxError> {
    let count_val = evaluate(count, ctx.vars, ctx.registry, ctx.filename)?.to_number(location)?;
    if count_val < 0.0 {
        return Err(RexxError::loop_err("DO repeat count cannot be negative", location.clone()));
    }

    let mut remaining = count_val.trunc() as i64;
    while remaining > 0 {
        match run_iteration(body, label, ctx)? {
            BodyOutcome::Continue => {}
            BodyOutcome::StopLoop => break,
            BodyOutcome::Propagate(term) => return Ok(Some(term)),
        }
        remaining -= 1;
    }

    Ok(None)
}

/// Flatten a resolved collection Value into the sequence `DO ... OVER`
/// iterates, per `spec.md` §4.5.
fn collection_items(value: Value, location: &SourceLocation) -> Result<Vec<Value>, RexxError> {
    match value {
        Value::Null => Err(RexxError::loop_err(
            "cannot iterate an undefined collection",
            location.clone(),
        )),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::Compound(compound) => Ok(compound.iter().map(|(_, v)| v.clone()).collect()),
        other => Ok(vec![other]),
    }
}

fn exec_over(
    var: &Symbol,
    collection: &Expr,
    body: &[Clause],
    label: &Option<String>,
    location: &SourceLocation,
    ctx: &mut ExecContext,
) -> Result<Option<Termination>, RexxError> {
    let resolved = evaluate(collection, ctx.vars, ctx.registry, ctx.filename)?;
    let items = collection_items(resolved, location)?;

    let prior = capture_prior(var, ctx);
    let mut propagated = None;

    for item in items {
        ctx.vars.set(var, item);
        match run_iteration(body, label, ctx)? {
            BodyOutcome::Continue => {}
            BodyOutcome::StopLoop => break,
            BodyOutcome::Propagate(term) => {
                propagated = Some(term);
                break;
            }
        }
    }

    restore_prior(var, prior, ctx);
    Ok(propagated)
}
