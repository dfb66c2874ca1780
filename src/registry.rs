//! The function registry contract (`spec.md` §6): an external
//! collaborator the evaluator consults for `FuncCall` nodes. The core
//! only depends on the trait; `BuiltinRegistry` below is one small,
//! swappable default implementation, not "the" function library.

use crate::error::{ErrorKind, RexxError, SourceLocation};
use crate::value::Value;

pub trait FunctionRegistry {
    /// Look up and invoke `name` (already upper-cased by the caller)
    /// with positionally-evaluated arguments. Absence is a
    /// `COMMAND`-class error, matching `spec.md` §4.3 rule 5.
    fn call(&self, name: &str, args: &[Value], location: &SourceLocation) -> Result<Value, RexxError>;
}

fn missing(name: &str, location: &SourceLocation) -> RexxError {
    RexxError::new(
        ErrorKind::Command,
        format!("no function named '{name}' is registered"),
        location.clone(),
    )
}

fn arg(args: &[Value], idx: usize, location: &SourceLocation) -> Result<Value, RexxError> {
    args.get(idx).cloned().ok_or_else(|| {
        RexxError::new(
            ErrorKind::Command,
            format!("missing argument {}", idx + 1),
            location.clone(),
        )
    })
}

/// A small default set of the built-ins `spec.md` §6 names as
/// examples (`UPPER`, `LOWER`, `LENGTH`, `SUBSTR`, `POS`, `STRIP`,
/// `WORDS`, …) — enough to make the `rexx` binary usable, not a
/// complete library (the complete library is out of scope, §1).
#[derive(Default)]
pub struct BuiltinRegistry;

impl FunctionRegistry for BuiltinRegistry {
    fn call(&self, name: &str, args: &[Value], location: &SourceLocation) -> Result<Value, RexxError> {
        match name {
            "UPPER" => Ok(Value::str(arg(args, 0, location)?.to_rexx_string().to_uppercase())),
            "LOWER" => Ok(Value::str(arg(args, 0, location)?.to_rexx_string().to_lowercase())),
            "LENGTH" => Ok(Value::Number(arg(args, 0, location)?.to_rexx_string().chars().count() as f64)),
            "REVERSE" => Ok(Value::str(
                arg(args, 0, location)?.to_rexx_string().chars().rev().collect::<String>(),
            )),
            "SUBSTR" => {
                let s = arg(args, 0, location)?.to_rexx_string();
                let start = arg(args, 1, location)?.to_number(location)? as isize;
                let len = args.get(2).map(|v| v.to_number(location)).transpose()?;
                Ok(Value::str(substr(&s, start, len)))
            }
            "POS" => {
                let haystack = arg(args, 0, location)?.to_rexx_string();
                let needle = arg(args, 1, location)?.to_rexx_string();
                let pos = haystack.find(&needle).map(|byte_idx| {
                    haystack[..byte_idx].chars().count() as f64 + 1.0
                });
                Ok(Value::Number(pos.unwrap_or(0.0)))
            }
            "STRIP" => Ok(Value::str(arg(args, 0, location)?.to_rexx_string().trim().to_owned())),
            "WORDS" => {
                let s = arg(args, 0, location)?.to_rexx_string();
                Ok(Value::Number(s.split_whitespace().count() as f64))
            }
            "WORD" => {
                let s = arg(args, 0, location)?.to_rexx_string();
                let n = arg(args, 1, location)?.to_number(location)? as usize;
                let word = s.split_whitespace().nth(n.saturating_sub(1)).unwrap_or("");
                Ok(Value::str(word))
            }
            "ABS" => Ok(Value::Number(arg(args, 0, location)?.to_number(location)?.abs())),
            "TRUNC" => Ok(Value::Number(arg(args, 0, location)?.to_number(location)?.trunc())),
            "MAX" => numeric_fold(args, location, f64::max),
            "MIN" => numeric_fold(args, location, f64::min),
            "DATATYPE" => {
                let s = arg(args, 0, location)?.to_rexx_string();
                let kind = if s.trim().parse::<f64>().is_ok() { "NUM" } else { "CHAR" };
                Ok(Value::str(kind))
            }
            _ => Err(missing(name, location)),
        }
    }
}

fn numeric_fold(
    args: &[Value],
    location: &SourceLocation,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, RexxError> {
    let mut numbers = args.iter().map(|v| v.to_number(location));
    let Some(first) = numbers.next() else {
        return Err(RexxError::new(ErrorKind::Command, "expected at least one argument", location.clone()));
    };
    let mut acc = first?;
    for n in numbers {
        acc = f(acc, n?);
    }
    Ok(Value::Number(acc))
}

/// 1-based, REXX-style substring extraction.
fn substr(s: &str, start: isize, len: Option<f64>) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start_idx = (start - 1).max(0) as usize;
    if start_idx >= chars.len() {
        return String::new();
    }
    let available = chars.len() - start_idx;
    let take = len.map(|l| (l.max(0.0) as usize).min(available)).unwrap_or(available);
    chars[start_idx..start_idx + take].iter().collect()
}
