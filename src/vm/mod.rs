/// The stack machine. `interpret` compiles a source string and feeds the
/// resulting chunk to the decode and dispatch loop in `run`; `operations`
/// and `variables` hold the instruction implementations that are more than
/// a couple of lines.
use std::rc::Rc;

use crate::{
    chunk::{Chunk, OpCode},
    compiler::Compiler,
    constants::STACK_MAX,
    table::Table,
    value::{
        Value,
        objects::{Heap, Obj},
    },
    vm::errors::InterpretError,
};

#[cfg(feature = "debug_trace_execution")]
use crate::debug::Debug;

pub mod errors;
mod operations;
mod variables;

pub struct VM {
    /// The chunk being executed. Swapped in by `interpret` and released
    /// again when the run ends.
    chunk: Chunk,
    /// Offset of the next byte to decode.
    ip: usize,
    /// Value stack, bounded at `STACK_MAX` slots.
    stack: Vec<Value>,
    /// Global variables, keyed by interned name.
    globals: Table,
    /// Owns every runtime object, including the string intern set.
    heap: Heap,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            ip: 0,
            stack: Vec::with_capacity(STACK_MAX),
            globals: Table::new(),
            heap: Heap::new(),
        }
    }

    /// Compiles and runs one source string. Compile errors abort before
    /// any bytecode executes; runtime errors abort execution with the
    /// stack reset. The compiled chunk is dropped on every path.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let chunk = Compiler::new(source, &mut self.heap)
            .compile()
            .map_err(InterpretError::Compile)?;

        self.chunk = chunk;
        self.ip = 0;
        let result = self.run();
        self.chunk = Chunk::new();

        result
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.chunk.code[self.ip];
        self.ip += 1;
        byte
    }

    fn read_constant(&mut self) -> Value {
        let index = self.read_byte() as usize;
        self.chunk.constants[index].clone()
    }

    /// Reads a constant that must be an interned name; anything else means
    /// the chunk is corrupt.
    pub(super) fn read_string_constant(&mut self) -> Result<Rc<Obj>, InterpretError> {
        let constant = self.read_constant();
        constant
            .as_obj()
            .ok_or_else(|| self.runtime_error(format_args!("Variable name must be a string.")))
    }

    pub(super) fn push(&mut self, value: Value) -> Result<(), InterpretError> {
        if self.stack.len() == STACK_MAX {
            return Err(self.runtime_error(format_args!("Stack overflow.")));
        }
        self.stack.push(value);
        Ok(())
    }

    pub(super) fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Value `distance` slots down from the top, without popping.
    pub(super) fn peek(&self, distance: usize) -> Option<&Value> {
        self.stack
            .len()
            .checked_sub(1 + distance)
            .and_then(|index| self.stack.get(index))
    }

    pub(super) fn reset_stack(&mut self) {
        self.stack.clear();
    }

    fn run(&mut self) -> Result<(), InterpretError> {
        loop {
            #[cfg(feature = "debug_trace_execution")]
            self.trace();

            let instruction = self.read_byte();
            let opcode = match OpCode::try_from(instruction) {
                Ok(opcode) => opcode,
                Err(error) => return Err(self.runtime_error(format_args!("{error}"))),
            };

            match opcode {
                OpCode::OpReturn => return Ok(()),

                OpCode::OpConstant => {
                    let constant = self.read_constant();
                    self.push(constant)?;
                }
                OpCode::OpNil => self.push(Value::Nil)?,
                OpCode::OpTrue => self.push(Value::Bool(true))?,
                OpCode::OpFalse => self.push(Value::Bool(false))?,

                OpCode::OpPop => {
                    self.pop().ok_or_else(|| {
                        self.runtime_error(format_args!("Expected value on the stack."))
                    })?;
                }
                OpCode::OpPrint => {
                    let value = self.pop().ok_or_else(|| {
                        self.runtime_error(format_args!("Expected value on the stack."))
                    })?;
                    println!("{value}");
                }

                // Locals live directly in their stack slot; the operand is
                // the slot index.
                OpCode::OpGetLocal => {
                    let slot = self.read_byte() as usize;
                    let value = self.stack[slot].clone();
                    self.push(value)?;
                }
                OpCode::OpSetLocal => {
                    let slot = self.read_byte() as usize;
                    // Assignment is an expression; the value stays on top.
                    let value = self.peek(0).cloned().ok_or_else(|| {
                        self.runtime_error(format_args!("Expected value on the stack."))
                    })?;
                    self.stack[slot] = value;
                }

                OpCode::OpDefineGlobal => self.op_define_global()?,
                OpCode::OpGetGlobal => self.op_get_global()?,
                OpCode::OpSetGlobal => self.op_set_global()?,

                OpCode::OpEqual => self.op_equal()?,
                OpCode::OpNot => self.op_not()?,
                OpCode::OpNegate => self.op_negate()?,

                OpCode::OpAdd
                | OpCode::OpSubtract
                | OpCode::OpMultiply
                | OpCode::OpDivide
                | OpCode::OpGreater
                | OpCode::OpLess => self.binary_op(opcode)?,
            }
        }
    }

    /// Prints the stack and the instruction about to execute.
    #[cfg(feature = "debug_trace_execution")]
    fn trace(&self) {
        print!("          ");
        for value in &self.stack {
            print!("[ {value} ]");
        }
        println!();
        Debug::disassemble_instruction(&self.chunk, self.ip);
    }
}

#[cfg(test)]
mod tests;
