/// Heap objects and the allocator that owns them.
///
/// Strings are the only object kind. Every allocation goes through the
/// `Heap`, which interns strings so that equal contents always share one
/// allocation; handle identity is then a sound equality check, and the
/// tables can compare keys by pointer.
use std::fmt::Display;
use std::rc::Rc;

use crate::table::Table;
use crate::value::Value;

/// A heap-allocated object, tagged by kind.
#[derive(Debug)]
pub enum Obj {
    String(ObjString),
}

/// An immutable interned string: its bytes plus a precomputed FNV-1a hash.
#[derive(Debug)]
pub struct ObjString {
    pub chars: Box<str>,
    pub hash: u32,
}

impl Obj {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String(string) => &string.chars,
        }
    }

    pub fn hash(&self) -> u32 {
        match self {
            Self::String(string) => string.hash,
        }
    }
}

impl Display for Obj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(string) => write!(f, "{}", string.chars),
        }
    }
}

/// 32-bit FNV-1a over the string's bytes.
pub fn hash_string(chars: &str) -> u32 {
    let mut hash: u32 = 2166136261;
    for byte in chars.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

/// Owner of the object graph for one VM.
///
/// `objects` records every allocation in order, so the whole graph can be
/// released in one sweep when the VM goes away. `strings` is the intern
/// set: its keys are the canonical string objects, its values are all nil.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Rc<Obj>>,
    strings: Table,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            strings: Table::new(),
        }
    }

    /// Interns the given characters, copying them only when no equal string
    /// exists yet. Equal contents always yield the same handle.
    pub fn copy_string(&mut self, chars: &str) -> Rc<Obj> {
        let hash = hash_string(chars);
        if let Some(interned) = self.strings.find_string(chars, hash) {
            return interned;
        }
        self.allocate_string(chars.to_owned(), hash)
    }

    /// Interns a buffer the caller already built, taking ownership of it.
    /// When an equal string is already interned the buffer is dropped and
    /// the canonical object returned instead.
    pub fn take_string(&mut self, chars: String) -> Rc<Obj> {
        let hash = hash_string(&chars);
        if let Some(interned) = self.strings.find_string(&chars, hash) {
            return interned;
        }
        self.allocate_string(chars, hash)
    }

    fn allocate_string(&mut self, chars: String, hash: u32) -> Rc<Obj> {
        let object = Rc::new(Obj::String(ObjString {
            chars: chars.into_boxed_str(),
            hash,
        }));
        self.strings.set(Rc::clone(&object), Value::Nil);
        self.objects.push(Rc::clone(&object));
        object
    }

    /// Number of objects allocated so far.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
