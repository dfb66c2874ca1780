//! The `Value` type and the `Compound` structure backing compound
//! symbols (`a.b.c`). See `spec.md` §3.

use std::fmt::Display;

use crate::error::{ErrorKind, RexxError, SourceLocation};

/// An ordered, insertion-order-preserving tail map. Hand-rolled over a
/// `Vec` rather than pulling in `indexmap`, since the scope here is small.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    /// The stem's own scalar value, if it was ever assigned directly
    /// (`A = v`) as opposed to only through a tail (`A.B = v`).
    pub scalar: Option<Box<Value>>,
    tails: Vec<(String, Value)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tail: &str) -> Option<&Value> {
        self.tails.iter().find(|(k, _)| k == tail).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, tail: &str) -> Option<&mut Value> {
        self.tails
            .iter_mut()
            .find(|(k, _)| k == tail)
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, tail: impl Into<String>, value: Value) {
        let tail = tail.into();
        if let Some(entry) = self.tails.iter_mut().find(|(k, _)| *k == tail) {
            entry.1 = value;
        } else {
            self.tails.push((tail, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.tails.iter()
    }

    pub fn len(&self) -> usize {
        self.tails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tails.is_empty()
    }
}

/// A runtime value. `Bool` does not exist as its own variant: REXX
/// truth is the strings `'1'`/`'0'`, so boolean results are produced
/// as `Value::Str`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Compound(Compound),
    Null,
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn bool(b: bool) -> Self {
        Value::Str(if b { "1".to_owned() } else { "0".to_owned() })
    }

    /// Canonical string form of this value, used whenever a value
    /// needs to be printed, concatenated, or compared as text.
    pub fn to_rexx_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::Null => String::new(),
            Value::Compound(compound) => compound
                .scalar
                .as_ref()
                .map(|v| v.to_rexx_string())
                .unwrap_or_default(),
        }
    }

    /// Reparse the canonical string form as a number, for arithmetic
    /// and relational contexts.
    pub fn to_number(&self, location: &SourceLocation) -> Result<f64, RexxError> {
        let text = self.to_rexx_string();
        text.trim().parse::<f64>().map_err(|_| {
            RexxError::new(
                ErrorKind::Arith,
                format!("'{text}' is not a valid number"),
                location.clone(),
            )
        })
    }

    /// Boolean-coerce this value: `'1'`/`'0'` strings, or numeric
    /// non-zero/zero.
    pub fn truthy(&self, location: &SourceLocation) -> Result<bool, RexxError> {
        let text = self.to_rexx_string();
        match text.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => {
                if let Ok(n) = text.trim().parse::<f64>() {
                    Ok(n != 0.0)
                } else {
                    Err(RexxError::new(
                        ErrorKind::Arith,
                        format!("'{text}' is not a valid boolean expression (expected '1' or '0')"),
                        location.clone(),
                    ))
                }
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rexx_string())
    }
}

/// Format a number the way REXX expects: integral values print
/// without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{n}");
        if s.contains('e') || s.contains('E') {
            s = format!("{n:.6}").trim_end_matches('0').trim_end_matches('.').to_owned();
        }
        s
    }
}
