/// Single-pass compiler: parses the source and emits bytecode in the same
/// walk, with no AST in between. Expressions go through the Pratt rule
/// table in `precedence`; statements and declarations live in
/// `statements`. Each `compile` call owns its whole state, so nothing
/// survives between compilations except the heap it interns into.
use crate::{
    chunk::{Chunk, OpCode},
    compiler::{errors::Diagnostic, parser::Parser},
    constants::UINT8_COUNT,
    scanner::{
        Scanner,
        token::{Token, TokenType},
    },
    table::Table,
    value::{Value, objects::Heap},
};

#[cfg(feature = "debug_print_code")]
use crate::debug::Debug;

pub mod errors;
mod expressions;
mod literals;
pub mod parser;
pub mod precedence;
mod scope;
mod statements;
mod variables;

/// A local variable slot: its name token and the depth of the scope that
/// declared it. Depth -1 marks a local whose initializer is still being
/// compiled.
struct Local {
    name: Token,
    depth: i32,
}

pub struct Compiler<'a> {
    source: &'a str,
    parser: Parser<'a>,
    /// The chunk being emitted into; handed to the caller on success.
    chunk: Chunk,
    /// Interns string literals and identifier names while compiling.
    heap: &'a mut Heap,
    /// Declared locals in declaration order; the index of a local is the
    /// VM stack slot it will occupy.
    locals: Vec<Local>,
    /// 0 is the global scope; each `{` nests one deeper.
    scope_depth: i32,
    /// Names of globals declared earlier in this compilation, used to
    /// resolve reads inside a shadowing local's own initializer.
    declared_globals: Table,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a str, heap: &'a mut Heap) -> Self {
        let scanner = Scanner::new(source);
        Self {
            source,
            parser: Parser::new(scanner),
            chunk: Chunk::new(),
            heap,
            locals: Vec::with_capacity(UINT8_COUNT),
            scope_depth: 0,
            declared_globals: Table::new(),
        }
    }

    /// Compiles the whole source to a chunk, or reports every diagnostic
    /// the parse produced. The chunk always ends in `OpReturn`.
    pub fn compile(mut self) -> Result<Chunk, Vec<Diagnostic>> {
        // Prime the token pair; the rules look at `previous`.
        self.parser.advance();

        while !self.parser.match_token(TokenType::Eof) {
            self.declaration();
        }

        self.end_compiler();

        if self.parser.had_error() {
            Err(self.parser.into_diagnostics())
        } else {
            Ok(self.chunk)
        }
    }

    fn end_compiler(&mut self) {
        self.emit_return();

        #[cfg(feature = "debug_print_code")]
        if !self.parser.had_error() {
            Debug::disassemble_chunk(&self.chunk, "code");
        }
    }

    /// Appends one byte, attributed to the line of the token just
    /// consumed so runtime errors point at the right source line.
    pub(super) fn emit_byte(&mut self, byte: u8) {
        let line = self.parser.previous.line;
        self.chunk.write_chunk(byte, line);
    }

    /// An opcode followed by its one-byte operand.
    pub(super) fn emit_bytes(&mut self, byte1: u8, byte2: u8) {
        self.emit_byte(byte1);
        self.emit_byte(byte2);
    }

    fn emit_return(&mut self) {
        self.emit_byte(OpCode::OpReturn as u8);
    }

    pub(super) fn emit_constant(&mut self, value: Value) {
        let constant = self.make_constant(value);
        self.emit_bytes(OpCode::OpConstant as u8, constant);
    }

    /// Adds a constant to the pool and returns its index, enforcing the
    /// one-byte operand limit of 256 constants per chunk.
    pub(super) fn make_constant(&mut self, value: Value) -> u8 {
        let constant = self.chunk.add_constant(value);
        if constant > u8::MAX as usize {
            self.parser.error("Too many constants in one chunk.");
            return 0;
        }

        constant as u8
    }
}
