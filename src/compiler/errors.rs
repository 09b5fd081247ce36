use thiserror::Error;

/// One compile-time error report. Rendered exactly as
/// `[line N] Error at 'lexeme': message`, with ` at end` for errors at EOF
/// and no location for lex failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct Diagnostic {
    pub line: i32,
    pub location: String,
    pub message: String,
}
