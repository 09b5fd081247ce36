/// Open-addressed hash table keyed by interned string objects.
///
/// The same engine backs the VM's global variables and the string intern
/// set. Collisions are resolved by linear probing; deletions leave
/// tombstones so probe chains stay intact. Because keys are interned,
/// every lookup except `find_string` compares keys by handle identity.
use std::rc::Rc;

use crate::value::Value;
use crate::value::objects::Obj;

const TABLE_MAX_LOAD: f64 = 0.75;

/// One slot of the backing array. Three states:
/// empty (`key: None, value: Nil`), live (`key: Some`), and
/// tombstone (`key: None, value: Bool(true)`).
#[derive(Debug, Clone)]
struct Entry {
    key: Option<Rc<Obj>>,
    value: Value,
}

impl Entry {
    fn empty() -> Self {
        Self {
            key: None,
            value: Value::Nil,
        }
    }
}

#[derive(Debug, Default)]
pub struct Table {
    /// Live entries plus tombstones. Never decremented by `delete`.
    count: usize,
    /// Backing array; its length is the capacity, always 0 or a power of
    /// two ≥ 8.
    entries: Vec<Entry>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            count: 0,
            entries: Vec::new(),
        }
    }

    /// Slot that `key` lives in, or the slot an insertion should use: the
    /// first tombstone passed while probing, otherwise the empty slot that
    /// ended the probe. The load factor bound guarantees an empty slot
    /// exists, so the probe always terminates.
    fn find_entry(entries: &[Entry], key: &Rc<Obj>) -> usize {
        let capacity = entries.len();
        let mut index = key.hash() as usize % capacity;
        let mut tombstone: Option<usize> = None;

        loop {
            let entry = &entries[index];
            match &entry.key {
                None => {
                    if entry.value.is_nil() {
                        // Empty slot; reuse an earlier tombstone if we saw one.
                        return tombstone.unwrap_or(index);
                    }
                    // Tombstone. Remember the first and keep probing.
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Some(existing) if Rc::ptr_eq(existing, key) => return index,
                Some(_) => {}
            }
            index = (index + 1) % capacity;
        }
    }

    pub fn get(&self, key: &Rc<Obj>) -> Option<Value> {
        if self.count == 0 {
            return None;
        }
        let entry = &self.entries[Self::find_entry(&self.entries, key)];
        entry.key.as_ref().map(|_| entry.value.clone())
    }

    /// Inserts or overwrites. Returns true when the key was not present
    /// before. Inserting into a tombstone does not grow `count`; the
    /// tombstone was already counted.
    pub fn set(&mut self, key: Rc<Obj>, value: Value) -> bool {
        if (self.count + 1) as f64 > self.entries.len() as f64 * TABLE_MAX_LOAD {
            self.grow();
        }

        let index = Self::find_entry(&self.entries, &key);
        let entry = &mut self.entries[index];
        let is_new_key = entry.key.is_none();
        if is_new_key && entry.value.is_nil() {
            self.count += 1;
        }

        entry.key = Some(key);
        entry.value = value;
        is_new_key
    }

    /// Replaces the entry with a tombstone so probe chains through this
    /// slot keep working. Returns whether the key existed.
    pub fn delete(&mut self, key: &Rc<Obj>) -> bool {
        if self.count == 0 {
            return false;
        }

        let index = Self::find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        if entry.key.is_none() {
            return false;
        }

        entry.key = None;
        entry.value = Value::Bool(true);
        true
    }

    /// Copies every live entry of `from` into this table.
    pub fn add_all(&mut self, from: &Table) {
        for entry in &from.entries {
            if let Some(key) = &entry.key {
                self.set(Rc::clone(key), entry.value.clone());
            }
        }
    }

    /// Content-based lookup over the stored string keys; the one place
    /// identity comparison is not used. Interning is built on this: it
    /// returns the canonical object for the given characters, if any.
    pub fn find_string(&self, chars: &str, hash: u32) -> Option<Rc<Obj>> {
        if self.count == 0 {
            return None;
        }

        let capacity = self.entries.len();
        let mut index = hash as usize % capacity;
        loop {
            let entry = &self.entries[index];
            match &entry.key {
                None => {
                    // An empty non-tombstone slot ends the probe chain.
                    if entry.value.is_nil() {
                        return None;
                    }
                }
                Some(key) => {
                    if key.hash() == hash && key.as_str() == chars {
                        return Some(Rc::clone(key));
                    }
                }
            }
            index = (index + 1) % capacity;
        }
    }

    /// Doubles the backing array (first allocation: 8 slots) and re-probes
    /// every live entry into it. Tombstones are dropped, so `count` is
    /// recomputed from live entries alone.
    fn grow(&mut self) {
        let capacity = if self.entries.is_empty() {
            8
        } else {
            self.entries.len() * 2
        };
        let mut entries = vec![Entry::empty(); capacity];

        self.count = 0;
        for entry in &self.entries {
            if let Some(key) = &entry.key {
                let index = Self::find_entry(&entries, key);
                entries[index].key = Some(Rc::clone(key));
                entries[index].value = entry.value.clone();
                self.count += 1;
            }
        }

        self.entries = entries;
    }
}

#[cfg(test)]
mod tests;
