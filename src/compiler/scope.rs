use crate::{chunk::OpCode, compiler::Compiler, scanner::token::TokenType};

impl<'a> Compiler<'a> {
    pub(super) fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Leaving a scope pops its locals off the VM stack, newest first,
    /// and forgets their slots.
    pub(super) fn end_scope(&mut self) {
        self.scope_depth -= 1;

        while self
            .locals
            .last()
            .is_some_and(|local| local.depth > self.scope_depth)
        {
            self.emit_byte(OpCode::OpPop as u8);
            self.locals.pop();
        }
    }

    pub(super) fn block(&mut self) {
        while !self.parser.check(TokenType::RightBrace) && !self.parser.check(TokenType::Eof) {
            self.declaration();
        }

        self.parser.consume(TokenType::RightBrace, "Expect '}' after block.");
    }
}
