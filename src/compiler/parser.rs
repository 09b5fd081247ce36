/// Token cursor and error sink for one compilation.
///
/// The parser pulls tokens from the scanner on demand, keeps the
/// current/previous pair the Pratt rules look at, and collects every
/// diagnostic the compile produces. After the first error it enters panic
/// mode, which suppresses the cascade of follow-on errors until
/// `synchronize` reaches a statement boundary.
use crate::compiler::errors::Diagnostic;
use crate::scanner::{
    Scanner,
    token::{Token, TokenType},
};

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    pub current: Token,
    pub previous: Token,
    pub panic_mode: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(scanner: Scanner<'a>) -> Self {
        Self {
            scanner,
            current: Token::placeholder(),
            previous: Token::placeholder(),
            panic_mode: false,
            diagnostics: Vec::new(),
        }
    }

    /// Steps to the next token. Lex failures become diagnostics and
    /// scanning simply continues, so the caller always ends up with a
    /// valid `current` token (at worst `Eof`).
    pub fn advance(&mut self) {
        self.previous = self.current;

        loop {
            match self.scanner.scan_token() {
                Ok(token) => {
                    self.current = token;
                    break;
                }
                Err(error) => {
                    self.report(Diagnostic {
                        line: error.line(),
                        location: String::new(),
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    /// Consumes the current token if it has the expected type, otherwise
    /// reports `message` at it.
    pub fn consume(&mut self, ty: TokenType, message: &str) {
        if self.current.ty == ty {
            self.advance();
            return;
        }

        self.error_at_current(message);
    }

    pub fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    /// Consumes the current token iff it matches, reporting whether it did.
    pub fn match_token(&mut self, ty: TokenType) -> bool {
        if !self.check(ty) {
            return false;
        }
        self.advance();
        true
    }

    /// Reports an error at the token just consumed.
    pub fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    /// Reports an error at the token about to be consumed.
    pub fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token, message: &str) {
        let location = match token.ty {
            TokenType::Eof => " at end".to_owned(),
            TokenType::Error => String::new(),
            _ => format!(" at '{}'", token.as_str(self.scanner.source)),
        };
        self.report(Diagnostic {
            line: token.line,
            location,
            message: message.to_owned(),
        });
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        // While panicking, every further error is dropped; they are almost
        // always artifacts of the first one.
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.diagnostics.push(diagnostic);
    }

    /// Leaves panic mode by discarding tokens up to a statement boundary:
    /// just past a `;`, or right before a keyword that starts a statement.
    pub fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.ty != TokenType::Eof {
            if self.previous.ty == TokenType::Semicolon {
                return;
            }
            match self.current.ty {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {}
            }
            self.advance();
        }
    }

    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
