//! # Rexx
//!
//! This binary exercises the `rexx_core` library: it wires up the
//! default function registry, ADDRESS target, and a `println!`-backed
//! SAY sink, then either runs a script file once or starts the REPL.

mod cli;
mod repl;

use std::fs;
use std::process::ExitCode;

use cli::{Cli, Commands};
use log::error;
use rexx_core::Interpreter;

fn main() -> ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    match args.command {
        Commands::Run(run_args) => {
            let source = match fs::read_to_string(&run_args.file) {
                Ok(source) => source,
                Err(err) => {
                    error!("could not read '{}': {err}", run_args.file.display());
                    return ExitCode::FAILURE;
                }
            };

            let filename = run_args.file.display().to_string();
            let mut interpreter = Interpreter::new(filename, Box::new(|line: &str| println!("{line}")));
            if let Err(err) = interpreter.execute(&source) {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        }
        Commands::Repl => {
            let mut interpreter = Interpreter::new("repl", Box::new(|line: &str| println!("{line}")));
            repl::run(&mut interpreter);
        }
    }

    ExitCode::SUCCESS
}
