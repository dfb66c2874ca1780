//! The single error type propagated out of every core operation.
//!
//! Mirrors the shape the rest of the `y-lang` error types use
//! (`message` + `position`, manual `Display`/`Error` impls) rather than
//! pulling in a derive-macro error crate.

use std::fmt::Display;

/// Where in the source an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub source_line: String,
    pub source_filename: String,
}

impl SourceLocation {
    pub fn new(line: usize, source_line: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            line,
            source_line: source_line.into(),
            source_filename: filename.into(),
        }
    }

    /// A location with no useful source context, for errors raised
    /// outside of a running script (e.g. REPL dot-commands).
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Category tag for a `RexxError`, used by callers to branch on the
/// kind of failure without string-matching the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Arith,
    Loop,
    Command,
    Signal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SYNTAX",
            ErrorKind::Arith => "ARITH",
            ErrorKind::Loop => "LOOP",
            ErrorKind::Command => "COMMAND",
            ErrorKind::Signal => "SIGNAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RexxError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl RexxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Syntax, message, location)
    }

    pub fn arith(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Arith, message, location)
    }

    pub fn loop_err(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Loop, message, location)
    }

    pub fn command(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Command, message, location)
    }

    pub fn signal(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Signal, message, location)
    }

    /// Attach the offending source line's text, once the caller (the
    /// interpreter shell, which owns the full source) can look it up.
    /// Construction sites inside the lexer/parser/evaluator don't carry
    /// a reference to the full source, so they leave this blank.
    pub fn with_source_line(mut self, source_line: impl Into<String>) -> Self {
        self.location.source_line = source_line.into();
        self
    }
}

impl Display for RexxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loc = &self.location;
        if loc.source_filename.is_empty() {
            write!(f, "{}: {}", self.kind.as_str(), self.message)
        } else {
            write!(
                f,
                "{} ({}:{}): {}",
                self.kind.as_str(),
                loc.source_filename,
                loc.line,
                self.message
            )
        }
    }
}

impl std::error::Error for RexxError {}

pub type RexxResult<T> = Result<T, RexxError>;
