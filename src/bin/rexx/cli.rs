//! Everything needed for parsing the CLI arguments for `rexx`.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Specify the log level of the interpreter.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// A log level where syntax and runtime errors reported to the
    /// user are also logged.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the interpreter,
    /// e.g., ADDRESS dispatches and loop entry/exit.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the interpreter.
    /// Note: this output can be quite clunky, since _very much_ will be
    /// logged.
    #[value(alias("3"))]
    Debug,

    /// Log extra information, down to every lexed token and evaluated
    /// expression.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a script file once and exit.
    Run(RunArgs),

    /// Start the interactive shell.
    Repl,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// The path to the REXX source file.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,
}
