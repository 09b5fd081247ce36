use std::rc::Rc;

use crate::vm::{VM, errors::InterpretError};

impl VM {
    /// `var` at the top level. The name comes from the constant pool, the
    /// initializer is on the stack. Defining is unconditional: redefining
    /// an existing global simply overwrites it.
    pub(super) fn op_define_global(&mut self) -> Result<(), InterpretError> {
        let name = self.read_string_constant()?;
        let value = self
            .peek(0)
            .cloned()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        self.globals.set(name, value);
        self.pop();
        Ok(())
    }

    pub(super) fn op_get_global(&mut self) -> Result<(), InterpretError> {
        let name = self.read_string_constant()?;
        match self.globals.get(&name) {
            Some(value) => self.push(value),
            None => Err(self.runtime_error(format_args!(
                "Undefined variable '{}'.",
                name.as_str()
            ))),
        }
    }

    /// Assignment to a global that must already exist. `set` reports
    /// whether it inserted a fresh key; if it did, the variable was never
    /// defined, so the accidental entry is deleted before erroring.
    pub(super) fn op_set_global(&mut self) -> Result<(), InterpretError> {
        let name = self.read_string_constant()?;
        // Assignment is an expression; the value stays on the stack.
        let value = self
            .peek(0)
            .cloned()
            .ok_or_else(|| self.runtime_error(format_args!("Expected value on the stack.")))?;

        if self.globals.set(Rc::clone(&name), value) {
            self.globals.delete(&name);
            return Err(self.runtime_error(format_args!(
                "Undefined variable '{}'.",
                name.as_str()
            )));
        }
        Ok(())
    }
}
