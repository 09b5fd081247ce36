use crate::{chunk::OpCode, compiler::Compiler, scanner::token::TokenType};

impl<'a> Compiler<'a> {
    /// Top-level grammar rule: a `var` declaration or a statement. Also
    /// the recovery point: if the parse panicked anywhere inside, skip to
    /// the next statement boundary before continuing.
    pub(super) fn declaration(&mut self) {
        if self.parser.match_token(TokenType::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.parser.panic_mode {
            self.parser.synchronize();
        }
    }

    /// `var name;` or `var name = expr;`. A missing initializer defaults
    /// the variable to nil.
    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");

        if self.parser.match_token(TokenType::Equal) {
            self.expression();
        } else {
            self.emit_byte(OpCode::OpNil as u8);
        }
        self.parser
            .consume(TokenType::Semicolon, "Expect ';' after variable declaration.");

        self.define_variable(global);
    }

    fn statement(&mut self) {
        if self.parser.match_token(TokenType::Print) {
            self.print_statement();
        } else if self.parser.match_token(TokenType::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.parser.consume(TokenType::Semicolon, "Expect ';' after value.");
        self.emit_byte(OpCode::OpPrint as u8);
    }

    /// An expression evaluated for its side effects; the value is
    /// discarded.
    fn expression_statement(&mut self) {
        self.expression();
        self.parser
            .consume(TokenType::Semicolon, "Expect ';' after expression.");
        self.emit_byte(OpCode::OpPop as u8);
    }
}
