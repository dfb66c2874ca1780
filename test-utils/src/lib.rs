//! In-process test harness: wires an `Interpreter` to an in-memory SAY
//! sink and a recording ADDRESS target, so integration tests assert on
//! captured output and final variable state without spawning a
//! subprocess.

use std::cell::RefCell;
use std::rc::Rc;

use rexx_core::address::AddressTarget;
use rexx_core::error::{RexxError, RexxResult};
use rexx_core::registry::BuiltinRegistry;
use rexx_core::value::{Compound, Value};
use rexx_core::Interpreter;

struct RecordingAddress {
    log: Rc<RefCell<Vec<String>>>,
}

impl AddressTarget for RecordingAddress {
    fn execute(&mut self, command: &str) -> Result<Value, RexxError> {
        self.log.borrow_mut().push(command.to_owned());
        Ok(Value::Compound(Compound::new()))
    }
}

pub struct Harness {
    pub interpreter: Interpreter,
    say_output: Rc<RefCell<Vec<String>>>,
    commands: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new() -> Self {
        let say_output = Rc::new(RefCell::new(Vec::new()));
        let commands = Rc::new(RefCell::new(Vec::new()));

        let sink_handle = say_output.clone();
        let say: Box<dyn FnMut(&str)> = Box::new(move |line: &str| sink_handle.borrow_mut().push(line.to_owned()));

        let address = Box::new(RecordingAddress { log: commands.clone() });

        let interpreter = Interpreter::with_collaborators("test", Box::new(BuiltinRegistry), address, say);

        Self { interpreter, say_output, commands }
    }

    pub fn run(&mut self, source: &str) -> RexxResult<()> {
        self.interpreter.execute(source)
    }

    /// Every string the script passed to `SAY`, in emission order.
    pub fn output(&self) -> Vec<String> {
        self.say_output.borrow().clone()
    }

    /// Every raw command string dispatched to the ADDRESS target.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    /// The current value of a top-level variable, keyed case-insensitively.
    pub fn var(&self, name: &str) -> Option<Value> {
        let key = name.to_uppercase();
        self.interpreter.vars().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
