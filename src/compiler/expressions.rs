use crate::{
    chunk::OpCode,
    compiler::{
        Compiler,
        precedence::{ParseRule, Precedence},
    },
    scanner::token::TokenType,
};

impl<'a> Compiler<'a> {
    pub(super) fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    /// Pratt core. Consumes one token and runs its prefix rule, then keeps
    /// folding infix rules while the next operator binds at least as
    /// tightly as `precedence`.
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) {
        self.parser.advance();

        let Some(prefix_rule) = ParseRule::get_parse_rule(self.parser.previous.ty).prefix else {
            self.parser.error("Expect expression.");
            return;
        };

        // `=` is only an assignment when the target was parsed at
        // assignment level; everything tighter rejects it below.
        let can_assign = precedence as u8 <= Precedence::Assignment as u8;
        prefix_rule(self, can_assign);

        while precedence as u8 <= ParseRule::get_parse_rule(self.parser.current.ty).precedence as u8
        {
            self.parser.advance();
            if let Some(infix_rule) = ParseRule::get_parse_rule(self.parser.previous.ty).infix {
                infix_rule(self, can_assign);
            }
        }

        // A leftover `=` here means the expression to its left is not a
        // valid assignment target, e.g. `a + b = c`.
        if can_assign && self.parser.match_token(TokenType::Equal) {
            self.parser.error("Invalid assignment target.");
        }
    }

    /// The `(` has been consumed; parse the inner expression and require
    /// the closing paren. Grouping emits no bytecode of its own.
    pub(super) fn grouping(&mut self, _can_assign: bool) {
        self.expression();
        self.parser.consume(TokenType::RightParen, "Expect ')' after expression.");
    }

    /// Infix operators. The left operand is already on the stack; compile
    /// the right one at one level tighter (left-associativity), then emit
    /// the operator. `!=`, `>=` and `<=` compose from their complements.
    pub(super) fn binary(&mut self, _can_assign: bool) {
        let operator = self.parser.previous.ty;
        let rule = ParseRule::get_parse_rule(operator);
        self.parse_precedence(Precedence::from(rule.precedence as u8 + 1));

        match operator {
            TokenType::Plus => self.emit_byte(OpCode::OpAdd as u8),
            TokenType::Minus => self.emit_byte(OpCode::OpSubtract as u8),
            TokenType::Star => self.emit_byte(OpCode::OpMultiply as u8),
            TokenType::Slash => self.emit_byte(OpCode::OpDivide as u8),
            TokenType::BangEqual => self.emit_bytes(OpCode::OpEqual as u8, OpCode::OpNot as u8),
            TokenType::EqualEqual => self.emit_byte(OpCode::OpEqual as u8),
            TokenType::Greater => self.emit_byte(OpCode::OpGreater as u8),
            TokenType::GreaterEqual => self.emit_bytes(OpCode::OpLess as u8, OpCode::OpNot as u8),
            TokenType::Less => self.emit_byte(OpCode::OpLess as u8),
            TokenType::LessEqual => self.emit_bytes(OpCode::OpGreater as u8, OpCode::OpNot as u8),
            // Only tokens with a binary infix rule reach here.
            _ => unreachable!(),
        }
    }

    /// `-` and `!` in prefix position. The operand compiles first, at
    /// unary precedence, so the operator applies to the value on top.
    pub(super) fn unary(&mut self, _can_assign: bool) {
        let operator = self.parser.previous.ty;

        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenType::Bang => self.emit_byte(OpCode::OpNot as u8),
            TokenType::Minus => self.emit_byte(OpCode::OpNegate as u8),
            _ => unreachable!(),
        }
    }
}
