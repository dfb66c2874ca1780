//! The variable store: a mapping from normalized stem to `Value`,
//! with stem-update semantics for compound symbols. See `spec.md` §4.4.

use log::trace;

use crate::symbol::Symbol;
use crate::value::{Compound, Value};

/// An insertion-ordered store, required for deterministic `.vars`
/// output in the REPL (`spec.md` §4.4, §6).
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    entries: Vec<(String, Value)>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, stem: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == stem)
    }

    /// Read a symbol. Returns `None` if the symbol (or, for a compound
    /// symbol, any segment along its tail path) is unset — it is the
    /// caller's (the evaluator's) job to turn that into the
    /// default-to-name string.
    pub fn get(&self, symbol: &Symbol) -> Option<Value> {
        let root = self.entries.iter().find(|(k, _)| *k == symbol.stem)?.1.clone();

        if !symbol.is_compound() {
            return Some(root);
        }

        let mut current = &root;
        for segment in &symbol.tail {
            let Value::Compound(compound) = current else {
                return None;
            };
            current = compound.get(segment)?;
        }
        Some(current.clone())
    }

    /// Write a symbol. A flat assignment replaces the stem outright; a
    /// compound assignment (`A.B.C = v`) creates/extends nested
    /// `Compound`s along the tail path, preserving (or promoting) any
    /// prior scalar held directly at an intermediate stem.
    pub fn set(&mut self, symbol: &Symbol, value: Value) {
        trace!("assigning '{}' = '{}'", symbol.dotted_upper(), value);

        if !symbol.is_compound() {
            self.set_stem(&symbol.stem, value);
            return;
        }

        if self.index_of(&symbol.stem).is_none() {
            self.entries
                .push((symbol.stem.clone(), Value::Compound(Compound::new())));
        }
        let idx = self.index_of(&symbol.stem).expect("just inserted");
        set_path(&mut self.entries[idx].1, &symbol.tail, value);
    }

    fn set_stem(&mut self, stem: &str, value: Value) {
        if let Some(idx) = self.index_of(stem) {
            self.entries[idx].1 = value;
        } else {
            self.entries.push((stem.to_owned(), value));
        }
    }

    /// Read the raw value currently bound to a bare stem, ignoring any
    /// tail path. Used by `DO` loop-variable persistence (capture the
    /// prior binding, restore it after the loop).
    pub fn get_stem(&self, stem: &str) -> Option<Value> {
        self.entries.iter().find(|(k, _)| k == stem).map(|(_, v)| v.clone())
    }

    pub fn delete(&mut self, stem: &str) {
        self.entries.retain(|(k, _)| k != stem);
    }

    pub fn entries(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Recursively descend into (creating as needed) the `Compound` chain
/// rooted at `slot`, assigning `value` at the end of `tail`.
fn set_path(slot: &mut Value, tail: &[String], value: Value) {
    if tail.is_empty() {
        *slot = value;
        return;
    }

    if !matches!(slot, Value::Compound(_)) {
        let existing = std::mem::replace(slot, Value::Null);
        let scalar = match existing {
            Value::Null => None,
            other => Some(Box::new(other)),
        };
        *slot = Value::Compound(Compound {
            scalar,
            ..Compound::new()
        });
    }

    let Value::Compound(compound) = slot else {
        unreachable!("just normalized to Compound")
    };

    if tail.len() == 1 {
        compound.set(tail[0].clone(), value);
        return;
    }

    if compound.get(&tail[0]).is_none() {
        compound.set(tail[0].clone(), Value::Null);
    }
    let next = compound.get_mut(&tail[0]).expect("just inserted");
    set_path(next, &tail[1..], value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_roundtrip() {
        let mut store = VariableStore::new();
        let sym = Symbol::parse("x");
        store.set(&sym, Value::Number(10.0));
        assert_eq!(store.get(&sym), Some(Value::Number(10.0)));
    }

    #[test]
    fn compound_roundtrip_with_default_scalar() {
        let mut store = VariableStore::new();
        store.set(&Symbol::parse("data.user.name"), Value::str("Alice"));
        store.set(&Symbol::parse("data.user.age"), Value::Number(30.0));

        assert_eq!(
            store.get(&Symbol::parse("data.user.name")),
            Some(Value::str("Alice"))
        );
        assert_eq!(
            store.get(&Symbol::parse("data.user.age")),
            Some(Value::Number(30.0))
        );
        // sibling tail was never assigned
        assert_eq!(store.get(&Symbol::parse("data.user.email")), None);
    }

    #[test]
    fn insertion_order_preserved() {
        let mut store = VariableStore::new();
        store.set(&Symbol::parse("b"), Value::Number(1.0));
        store.set(&Symbol::parse("a"), Value::Number(2.0));
        let keys: Vec<_> = store.entries().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["B".to_owned(), "A".to_owned()]);
    }
}
