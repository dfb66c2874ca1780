//! The ADDRESS target contract (`spec.md` §6): where `Command` clauses
//! are dispatched. The core only depends on the trait; `DiagnosticAddress`
//! is the one small default shipped for the `rexx` binary to be runnable.

use log::info;

use crate::error::RexxError;
use crate::value::{Compound, Value};

pub trait AddressTarget {
    /// Execute a raw (already variable-interpolated) command string and
    /// return the result Value reported back to the `RESULT` variable.
    fn execute(&mut self, command: &str) -> Result<Value, RexxError>;
}

/// Writes the command to the log and reports an empty `Compound`,
/// matching §6's description of the default target exactly.
#[derive(Default)]
pub struct DiagnosticAddress;

impl AddressTarget for DiagnosticAddress {
    fn execute(&mut self, command: &str) -> Result<Value, RexxError> {
        info!("ADDRESS dispatch: {command}");
        Ok(Value::Compound(Compound::new()))
    }
}
