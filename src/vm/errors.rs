use std::fmt::Arguments;
use std::fmt::Write as _;

use thiserror::Error;

use crate::{compiler::errors::Diagnostic, vm::VM};

/// Outcome of `VM::interpret` when the program did not finish normally.
/// Compile errors carry every diagnostic the parse produced; runtime
/// errors carry the already-formatted report.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("{}", render_diagnostics(.0))]
    Compile(Vec<Diagnostic>),
    #[error("{0}")]
    Runtime(String),
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl VM {
    /// Builds a runtime error report: the message, then the source line of
    /// the instruction that failed. The stack is reset on the way out so a
    /// following interpretation starts clean.
    pub(crate) fn runtime_error(&mut self, arguments: Arguments) -> InterpretError {
        let mut message = format!("{arguments}\n");
        // `ip` has advanced past the instruction that failed.
        let offset = self.ip.saturating_sub(1);
        let _ = write!(message, "[line {}] in script", self.chunk.line_of(offset));

        self.reset_stack();

        InterpretError::Runtime(message)
    }
}
