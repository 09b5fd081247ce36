/// Disassembler for compiled chunks, used by the `debug_print_code` and
/// `debug_trace_execution` features.
use crate::chunk::{Chunk, OpCode};

pub struct Debug;

impl Debug {
    /// Prints every instruction of `chunk` under a header.
    pub fn disassemble_chunk(chunk: &Chunk, name: &str) {
        println!("== {name} ==");

        let mut offset = 0;
        while offset < chunk.code.len() {
            offset = Debug::disassemble_instruction(chunk, offset);
        }
    }

    /// Prints the instruction at `offset` and returns the offset of the
    /// next one. All instructions are one byte plus zero or one operand
    /// bytes.
    pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
        print!("{offset:04} ");

        // `|` marks bytes emitted from the same source line as the byte
        // before them.
        if offset > 0 && chunk.line_of(offset) == chunk.line_of(offset - 1) {
            print!("   | ");
        } else {
            print!("{: >4} ", chunk.line_of(offset));
        }

        let instruction = chunk.code[offset];
        match OpCode::try_from(instruction) {
            Ok(opcode) => match opcode {
                OpCode::OpReturn => Debug::simple_instruction("OpReturn", offset),
                OpCode::OpConstant => Debug::constant_instruction("OpConstant", chunk, offset),
                OpCode::OpNegate => Debug::simple_instruction("OpNegate", offset),
                OpCode::OpAdd => Debug::simple_instruction("OpAdd", offset),
                OpCode::OpSubtract => Debug::simple_instruction("OpSubtract", offset),
                OpCode::OpMultiply => Debug::simple_instruction("OpMultiply", offset),
                OpCode::OpDivide => Debug::simple_instruction("OpDivide", offset),
                OpCode::OpNil => Debug::simple_instruction("OpNil", offset),
                OpCode::OpTrue => Debug::simple_instruction("OpTrue", offset),
                OpCode::OpFalse => Debug::simple_instruction("OpFalse", offset),
                OpCode::OpNot => Debug::simple_instruction("OpNot", offset),
                OpCode::OpEqual => Debug::simple_instruction("OpEqual", offset),
                OpCode::OpGreater => Debug::simple_instruction("OpGreater", offset),
                OpCode::OpLess => Debug::simple_instruction("OpLess", offset),
                OpCode::OpPrint => Debug::simple_instruction("OpPrint", offset),
                OpCode::OpPop => Debug::simple_instruction("OpPop", offset),
                OpCode::OpDefineGlobal => {
                    Debug::constant_instruction("OpDefineGlobal", chunk, offset)
                }
                OpCode::OpGetGlobal => Debug::constant_instruction("OpGetGlobal", chunk, offset),
                OpCode::OpSetGlobal => Debug::constant_instruction("OpSetGlobal", chunk, offset),
                OpCode::OpGetLocal => Debug::byte_instruction("OpGetLocal", chunk, offset),
                OpCode::OpSetLocal => Debug::byte_instruction("OpSetLocal", chunk, offset),
            },
            Err(error) => {
                eprintln!("{error}");
                offset + 1
            }
        }
    }

    /// Opcode plus a constant-pool operand; shows the referenced value.
    fn constant_instruction(name: &str, chunk: &Chunk, offset: usize) -> usize {
        let constant_index = chunk.code[offset + 1];
        print!("{name: <16} {constant_index: >4} '");
        println!("{}'", chunk.constants[constant_index as usize]);
        offset + 2
    }

    fn simple_instruction(name: &str, offset: usize) -> usize {
        println!("{name}");
        offset + 1
    }

    /// Opcode plus a stack-slot operand.
    fn byte_instruction(name: &str, chunk: &Chunk, offset: usize) -> usize {
        let slot = chunk.code[offset + 1];
        println!("{name: <16} {slot: >4}");
        offset + 2
    }
}
