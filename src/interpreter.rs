//! The interpreter shell: orchestrates lex → parse → execute and owns
//! everything that outlives a single `execute` call. See `spec.md` §4.6.

use log::{debug, error};

use crate::address::{AddressTarget, DiagnosticAddress};
use crate::ast::{parse_program, Clause};
use crate::error::RexxResult;
use crate::exec::{exec_clauses, ExecContext};
use crate::lexer::{Lexer, TokenKind};
use crate::registry::{BuiltinRegistry, FunctionRegistry};
use crate::symbol::Symbol;
use crate::value::Value;
use crate::vars::VariableStore;

/// Owns the variable store, the function registry, the ADDRESS target,
/// and the SAY sink across repeated `execute` calls — the state the
/// REPL relies on to persist between commands.
pub struct Interpreter {
    vars: VariableStore,
    registry: Box<dyn FunctionRegistry>,
    address: Box<dyn AddressTarget>,
    say: Box<dyn FnMut(&str)>,
    filename: String,
}

impl Interpreter {
    pub fn new(filename: impl Into<String>, say: Box<dyn FnMut(&str)>) -> Self {
        let mut interpreter = Self {
            vars: VariableStore::new(),
            registry: Box::new(BuiltinRegistry),
            address: Box::new(DiagnosticAddress),
            say,
            filename: filename.into(),
        };
        interpreter.populate_runtime_facts();
        interpreter
    }

    pub fn with_collaborators(
        filename: impl Into<String>,
        registry: Box<dyn FunctionRegistry>,
        address: Box<dyn AddressTarget>,
        say: Box<dyn FnMut(&str)>,
    ) -> Self {
        let mut interpreter = Self {
            vars: VariableStore::new(),
            registry,
            address,
            say,
            filename: filename.into(),
        };
        interpreter.populate_runtime_facts();
        interpreter
    }

    /// Pre-populate the `RUNTIME.*` facts described by `spec.md` §3.
    fn populate_runtime_facts(&mut self) {
        self.vars.set(&Symbol::parse("RUNTIME.TYPE"), Value::str("rexx-core"));
        self.vars.set(&Symbol::parse("RUNTIME.HAS_DOM"), Value::bool(false));
        self.vars
            .set(&Symbol::parse("RUNTIME.HAS_NODEJS_REQUIRE"), Value::bool(false));
    }

    /// Lex, parse, and run `source`, reusing the variable store across
    /// calls. The sole entry point, per `spec.md` §4.6.
    pub fn execute(&mut self, source: &str) -> RexxResult<()> {
        debug!("executing {} bytes of source", source.len());
        let clauses: Vec<Clause> = parse_program(source, &self.filename).map_err(|err| self.enrich(err, source))?;

        let mut ctx = ExecContext {
            vars: &mut self.vars,
            registry: self.registry.as_ref(),
            address: self.address.as_mut(),
            say: self.say.as_mut(),
            filename: &self.filename,
        };

        match exec_clauses(&clauses, &mut ctx) {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = self.enrich(err, source);
                error!("{err}");
                Err(err)
            }
        }
    }

    /// Attach the offending line's source text, which only the shell
    /// (the owner of the full source string) can look up.
    fn enrich(&self, err: crate::error::RexxError, source: &str) -> crate::error::RexxError {
        let text = source.lines().nth(err.location.line.saturating_sub(1)).unwrap_or("");
        err.with_source_line(text)
    }

    /// Destroy the variable store and re-seed the runtime facts.
    pub fn reset(&mut self) {
        self.vars.clear();
        self.populate_runtime_facts();
    }

    pub fn set_address(&mut self, target: Box<dyn AddressTarget>) {
        self.address = target;
    }

    pub fn vars(&self) -> impl Iterator<Item = &(String, Value)> {
        self.vars.entries()
    }

    /// Syntactic look-ahead used by the REPL to decide whether to keep
    /// collecting lines before handing the buffer to `execute`. See
    /// `spec.md` §4.7 — purely token-level, never parses.
    pub fn needs_more_input(&self, partial: &str) -> bool {
        let Ok(tokens) = Lexer::new(partial, 1, &self.filename).lex() else {
            return false;
        };
        let significant: Vec<_> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
            .collect();

        let Some(last) = significant.last() else {
            return false;
        };

        if last.is_ident_upper("THEN") || last.is_ident_upper("ELSE") {
            return true;
        }

        if last.is_ident_upper("DO") {
            if let Some(second_last) = significant.get(significant.len().saturating_sub(2)) {
                if second_last.is_ident_upper("THEN") {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter_capturing(output: std::rc::Rc<std::cell::RefCell<Vec<String>>>) -> Interpreter {
        let sink = move |line: &str| output.borrow_mut().push(line.to_owned());
        Interpreter::new("t", Box::new(sink))
    }

    #[test]
    fn execute_persists_variables_across_calls() {
        let output = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut interp = interpreter_capturing(output);
        interp.execute("LET x = 10").unwrap();
        interp.execute("LET y = 20").unwrap();
        interp.execute("LET sum = x + y").unwrap();

        let sum = interp.vars().find(|(k, _)| k == "SUM").map(|(_, v)| v.clone());
        assert_eq!(sum, Some(Value::Number(30.0)));
    }

    #[test]
    fn reset_clears_variables_but_keeps_runtime_facts() {
        let output = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut interp = interpreter_capturing(output);
        interp.execute("LET x = 1").unwrap();
        interp.reset();
        assert!(interp.vars().all(|(k, _)| k != "X"));
        assert!(interp.vars().any(|(k, _)| k == "RUNTIME"));
    }

    #[test]
    fn error_in_one_call_does_not_tear_down_the_interpreter() {
        let output = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut interp = interpreter_capturing(output);
        assert!(interp.execute("LET x =").is_err());
        interp.execute("LET y = 42").unwrap();
        let y = interp.vars().find(|(k, _)| k == "Y").map(|(_, v)| v.clone());
        assert_eq!(y, Some(Value::Number(42.0)));
    }

    #[test]
    fn needs_more_input_flags_trailing_then_and_else() {
        let output = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let interp = interpreter_capturing(output);
        assert!(interp.needs_more_input("IF x > 5 THEN"));
        assert!(interp.needs_more_input("IF x > 5 THEN DO\nSAY 1\nELSE"));
        assert!(interp.needs_more_input("IF x > 5 THEN DO"));
        assert!(!interp.needs_more_input("DO i = 1 TO 10"));
        assert!(!interp.needs_more_input("SAY \"done\""));
    }
}
