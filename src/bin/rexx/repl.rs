//! The interactive shell: reads lines from stdin, handles the dot
//! commands, and feeds everything else to the interpreter through
//! `execute`, collecting continuation lines via `needs_more_input`.
//! See `spec.md` §4.7, §6.

use std::io::{self, Write};

use log::error;
use rexx_core::Interpreter;

const HELP_TEXT: &str = "\
.vars   dump the current variable store
.reset  clear the variable store
.help   show this message
.exit   leave the REPL";

pub fn run(interpreter: &mut Interpreter) {
    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("{}", if buffer.is_empty() { "rexx> " } else { "....> " });
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            println!();
            break;
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if buffer.is_empty() {
            match trimmed.trim() {
                ".exit" => break,
                ".help" => {
                    println!("{HELP_TEXT}");
                    continue;
                }
                ".reset" => {
                    interpreter.reset();
                    println!("variable store cleared.");
                    continue;
                }
                ".vars" => {
                    for (name, value) in interpreter.vars() {
                        println!("{name} = {value}");
                    }
                    continue;
                }
                _ => {}
            }
        }

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(trimmed);

        if interpreter.needs_more_input(&buffer) {
            continue;
        }

        if let Err(err) = interpreter.execute(&buffer) {
            error!("{err}");
            println!("{err}");
        }
        buffer.clear();
    }
}
