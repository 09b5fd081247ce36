use crate::{
    chunk::OpCode,
    value::Value,
    vm::{VM, errors::InterpretError},
};

impl VM {
    /// The two-operand instructions. Operand types are checked with `peek`
    /// before anything is popped, so a failing operation leaves the stack
    /// describable in the error report.
    pub(super) fn binary_op(&mut self, opcode: OpCode) -> Result<(), InterpretError> {
        let both_strings = self.peek(0).is_some_and(Value::is_string)
            && self.peek(1).is_some_and(Value::is_string);
        if opcode == OpCode::OpAdd && both_strings {
            return self.concatenate();
        }

        let both_numbers = self.peek(0).is_some_and(Value::is_number)
            && self.peek(1).is_some_and(Value::is_number);
        if !both_numbers {
            let message = if opcode == OpCode::OpAdd {
                "Operands must be two numbers or two strings."
            } else {
                "Operands must be numbers."
            };
            return Err(self.runtime_error(format_args!("{message}")));
        }

        // The right operand was pushed last, so it pops first.
        let rhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;
        let lhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        let result = match opcode {
            OpCode::OpAdd => lhs + rhs,
            OpCode::OpSubtract => lhs - rhs,
            OpCode::OpMultiply => lhs * rhs,
            OpCode::OpDivide => lhs / rhs,
            OpCode::OpGreater => Value::from(lhs.to_number() > rhs.to_number()),
            OpCode::OpLess => Value::from(lhs.to_number() < rhs.to_number()),
            // Only the binary opcodes are dispatched here.
            _ => unreachable!(),
        };

        self.push(result)
    }

    /// String concatenation for `OpAdd`. The combined buffer goes through
    /// the intern table, so concatenating to an existing string's contents
    /// yields the canonical object and the buffer is dropped.
    fn concatenate(&mut self) -> Result<(), InterpretError> {
        let rhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;
        let lhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        let (Some(left), Some(right)) = (lhs.as_string(), rhs.as_string()) else {
            return Err(self.runtime_error(format_args!(
                "Operands must be two numbers or two strings."
            )));
        };

        let mut chars = String::with_capacity(left.len() + right.len());
        chars.push_str(left);
        chars.push_str(right);

        let object = self.heap.take_string(chars);
        self.push(Value::Obj(object))
    }

    pub(super) fn op_equal(&mut self) -> Result<(), InterpretError> {
        let rhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;
        let lhs = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        self.push(Value::Bool(lhs == rhs))
    }

    /// `!` inverts truthiness and works on every value.
    pub(super) fn op_not(&mut self) -> Result<(), InterpretError> {
        let value = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        self.push(Value::Bool(value.is_falsey()))
    }

    pub(super) fn op_negate(&mut self) -> Result<(), InterpretError> {
        if !self.peek(0).is_some_and(Value::is_number) {
            return Err(self.runtime_error(format_args!("Operand must be a number.")));
        }

        let value = self
            .pop()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;
        self.push(-value)
    }
}
