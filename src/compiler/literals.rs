use crate::{chunk::OpCode, compiler::Compiler, scanner::token::TokenType, value::Value};

impl<'a> Compiler<'a> {
    /// Number literal: convert the lexeme with the standard float parser
    /// and emit it as a constant.
    pub(super) fn number(&mut self, _can_assign: bool) {
        let lexeme = self.parser.previous.as_str(self.source);
        match lexeme.parse::<f64>() {
            Ok(value) => self.emit_constant(Value::Number(value)),
            // The scanner only hands out digit runs, but report rather
            // than assume.
            Err(_) => self.parser.error("Invalid number literal."),
        }
    }

    /// String literal: the lexeme minus its surrounding quotes, interned
    /// so equal literals share one object.
    pub(super) fn string(&mut self, _can_assign: bool) {
        let token = self.parser.previous;
        let start = token.start + 1;
        let end = token.start + token.length as usize - 1;
        let object = self.heap.copy_string(&self.source[start..end]);
        self.emit_constant(Value::Obj(object));
    }

    /// `true`, `false` and `nil` have dedicated opcodes.
    pub(super) fn literal(&mut self, _can_assign: bool) {
        match self.parser.previous.ty {
            TokenType::False => self.emit_byte(OpCode::OpFalse as u8),
            TokenType::Nil => self.emit_byte(OpCode::OpNil as u8),
            TokenType::True => self.emit_byte(OpCode::OpTrue as u8),
            _ => unreachable!(),
        }
    }
}
