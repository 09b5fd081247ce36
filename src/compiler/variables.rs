use std::rc::Rc;

use crate::{
    chunk::OpCode,
    compiler::{Compiler, Local},
    constants::UINT8_COUNT,
    scanner::token::{Token, TokenType},
    value::Value,
};

impl<'a> Compiler<'a> {
    /// `var` declaration. Inside a scope the variable becomes a local
    /// (declared now, initialized once `define_variable` runs); at the top
    /// level its name goes into the constant pool and the returned index
    /// feeds `OpDefineGlobal`.
    pub(super) fn parse_variable(&mut self, message: &str) -> u8 {
        self.parser.consume(TokenType::Identifier, message);

        self.declare_variable();
        if self.scope_depth > 0 {
            // Locals are addressed by slot, not by name constant.
            return 0;
        }

        let name = self.parser.previous;
        self.identifier_constant(&name)
    }

    /// Records a new local for the name just consumed. Redeclaring a name
    /// within the same scope is an error; shadowing an outer scope is not.
    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }

        let name = self.parser.previous;
        let mut duplicate = false;
        for local in self.locals.iter().rev() {
            // Locals are ordered by depth; stop at the enclosing scope.
            if local.depth != -1 && local.depth < self.scope_depth {
                break;
            }
            if self.identifiers_equal(&name, &local.name) {
                duplicate = true;
                break;
            }
        }

        if duplicate {
            self.parser
                .error("Already a variable with this name in this scope.");
        }
        self.add_local(name);
    }

    fn add_local(&mut self, name: Token) {
        if self.locals.len() == UINT8_COUNT {
            self.parser.error("Too many local variables in function.");
            return;
        }

        // Depth -1 until the initializer has been compiled.
        self.locals.push(Local { name, depth: -1 });
    }

    /// Flips the newest local from "declared" to "initialized", making it
    /// resolvable from this point on.
    fn mark_initialized(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        let depth = self.scope_depth;
        if let Some(local) = self.locals.last_mut() {
            local.depth = depth;
        }
    }

    /// Emits the definition for the variable parsed by `parse_variable`.
    /// Locals are simply left on the stack in their slot; globals are
    /// stored into the globals table by name.
    pub(super) fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }

        // Remember the name so nested initializers can resolve reads of a
        // shadowed global.
        if let Some(Value::Obj(name)) = self.chunk.constants.get(global as usize) {
            self.declared_globals.set(Rc::clone(name), Value::Nil);
        }

        self.emit_bytes(OpCode::OpDefineGlobal as u8, global);
    }

    /// Prefix rule for identifiers: a read, or an assignment when an `=`
    /// follows in assignment context.
    pub(super) fn variable(&mut self, can_assign: bool) {
        let name = self.parser.previous;
        self.named_variable(name, can_assign);
    }

    fn named_variable(&mut self, name: Token, can_assign: bool) {
        let (get_op, set_op, arg) = match self.resolve_local(&name) {
            Some(slot) => (OpCode::OpGetLocal, OpCode::OpSetLocal, slot),
            None => {
                let constant = self.identifier_constant(&name);
                (OpCode::OpGetGlobal, OpCode::OpSetGlobal, constant)
            }
        };

        if can_assign && self.parser.match_token(TokenType::Equal) {
            self.expression();
            self.emit_bytes(set_op as u8, arg);
        } else {
            self.emit_bytes(get_op as u8, arg);
        }
    }

    /// Resolves a name against the declared locals, innermost first.
    /// `None` means the name refers to a global.
    ///
    /// A match on an uninitialized local means the name appears in that
    /// local's own initializer. When the name shadows a global declared
    /// earlier, and no enclosing local is in the way, the read refers to
    /// the global, since the new local does not exist yet. Shadowing an
    /// enclosing local that way, or a name with no prior declaration at
    /// all, is the classic own-initializer error.
    fn resolve_local(&mut self, name: &Token) -> Option<u8> {
        let found = self
            .locals
            .iter()
            .enumerate()
            .rev()
            .find(|(_, local)| self.identifiers_equal(name, &local.name));
        let (slot, depth) = match found {
            Some((slot, local)) => (slot, local.depth),
            None => return None,
        };

        if depth != -1 {
            return Some(slot as u8);
        }

        if !self.has_enclosing_local(name, slot) && self.is_declared_global(name) {
            return None;
        }

        self.parser
            .error("Can't read local variable in its own initializer.");
        // Keep compiling against the slot; the error already blocks
        // execution.
        Some(slot as u8)
    }

    fn has_enclosing_local(&self, name: &Token, below: usize) -> bool {
        self.locals[..below]
            .iter()
            .any(|local| self.identifiers_equal(name, &local.name))
    }

    fn is_declared_global(&mut self, name: &Token) -> bool {
        let key = self.heap.copy_string(name.as_str(self.source));
        self.declared_globals.get(&key).is_some()
    }

    /// Interns the identifier and stores it in the constant pool; global
    /// accesses reference their name this way.
    fn identifier_constant(&mut self, name: &Token) -> u8 {
        let object = self.heap.copy_string(name.as_str(self.source));
        self.make_constant(Value::Obj(object))
    }

    fn identifiers_equal(&self, a: &Token, b: &Token) -> bool {
        a.length == b.length && a.as_str(self.source) == b.as_str(self.source)
    }
}
