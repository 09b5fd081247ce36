use std::rc::Rc;

use crate::table::Table;
use crate::value::Value;
use crate::value::objects::{Heap, Obj, hash_string};

fn key(heap: &mut Heap, name: &str) -> Rc<Obj> {
    heap.copy_string(name)
}

fn assert_load_factor(table: &Table) {
    assert!(table.entries.is_empty() || table.count * 4 <= table.entries.len() * 3);
}

#[test]
fn set_then_get_round_trips() {
    let mut heap = Heap::new();
    let mut table = Table::new();

    let keys: Vec<Rc<Obj>> = (0..100).map(|i| key(&mut heap, &format!("k{i}"))).collect();
    for (i, k) in keys.iter().enumerate() {
        assert!(table.set(Rc::clone(k), Value::Number(i as f64)));
        assert_load_factor(&table);
    }

    for (i, k) in keys.iter().enumerate() {
        assert_eq!(table.get(k), Some(Value::Number(i as f64)));
    }
}

#[test]
fn capacity_grows_in_powers_of_two() {
    let mut heap = Heap::new();
    let mut table = Table::new();

    for i in 0..100 {
        table.set(key(&mut heap, &format!("k{i}")), Value::Nil);
        assert!(table.entries.len().is_power_of_two() && table.entries.len() >= 8);
    }
}

#[test]
fn overwriting_is_not_a_new_key() {
    let mut heap = Heap::new();
    let mut table = Table::new();
    let k = key(&mut heap, "answer");

    assert!(table.set(Rc::clone(&k), Value::Number(41.0)));
    assert!(!table.set(Rc::clone(&k), Value::Number(42.0)));
    assert_eq!(table.get(&k), Some(Value::Number(42.0)));
}

#[test]
fn delete_leaves_other_keys_resolvable() {
    let mut heap = Heap::new();
    let mut table = Table::new();

    let keys: Vec<Rc<Obj>> = (0..20).map(|i| key(&mut heap, &format!("k{i}"))).collect();
    for (i, k) in keys.iter().enumerate() {
        table.set(Rc::clone(k), Value::Number(i as f64));
    }

    assert!(table.delete(&keys[7]));
    assert!(!table.delete(&keys[7]));
    assert_eq!(table.get(&keys[7]), None);

    // Probe chains through the tombstone must stay intact.
    for (i, k) in keys.iter().enumerate() {
        if i != 7 {
            assert_eq!(table.get(k), Some(Value::Number(i as f64)));
        }
    }
}

#[test]
fn tombstones_are_reused_without_growing_count() {
    let mut heap = Heap::new();
    let mut table = Table::new();
    let k = key(&mut heap, "ghost");

    table.set(Rc::clone(&k), Value::Number(1.0));
    let count_before = table.count;

    // Deleting keeps the slot counted; re-inserting reuses the tombstone.
    assert!(table.delete(&k));
    assert_eq!(table.count, count_before);
    assert!(table.set(Rc::clone(&k), Value::Number(2.0)));
    assert_eq!(table.count, count_before);
    assert_eq!(table.get(&k), Some(Value::Number(2.0)));
}

#[test]
fn growth_drops_tombstones() {
    let mut heap = Heap::new();
    let mut table = Table::new();

    let keys: Vec<Rc<Obj>> = (0..6).map(|i| key(&mut heap, &format!("k{i}"))).collect();
    for k in &keys {
        table.set(Rc::clone(k), Value::Nil);
    }
    for k in &keys[..3] {
        table.delete(k);
    }
    assert_eq!(table.count, 6);

    // The next insertion pushes past the load factor and re-probes only
    // live entries.
    table.set(key(&mut heap, "trigger"), Value::Nil);
    assert_eq!(table.count, 4);
    for k in &keys[3..] {
        assert!(table.get(k).is_some());
    }
}

#[test]
fn find_string_matches_by_content() {
    let mut heap = Heap::new();
    let mut table = Table::new();
    let k = key(&mut heap, "needle");
    table.set(Rc::clone(&k), Value::Nil);

    let found = table.find_string("needle", hash_string("needle"));
    assert!(found.is_some_and(|obj| Rc::ptr_eq(&obj, &k)));
    assert!(
        table
            .find_string("missing", hash_string("missing"))
            .is_none()
    );
}

#[test]
fn add_all_copies_live_entries() {
    let mut heap = Heap::new();
    let mut from = Table::new();
    let mut to = Table::new();

    let a = key(&mut heap, "a");
    let b = key(&mut heap, "b");
    from.set(Rc::clone(&a), Value::Number(1.0));
    from.set(Rc::clone(&b), Value::Number(2.0));
    from.delete(&b);

    to.add_all(&from);
    assert_eq!(to.get(&a), Some(Value::Number(1.0)));
    assert_eq!(to.get(&b), None);
}

#[test]
fn interning_yields_one_object_per_content() {
    let mut heap = Heap::new();

    let first = heap.copy_string("shared");
    let second = heap.copy_string("shared");
    assert!(Rc::ptr_eq(&first, &second));

    // take_string drops its buffer when the contents are already interned.
    let third = heap.take_string(String::from("shared"));
    assert!(Rc::ptr_eq(&first, &third));

    let other = heap.copy_string("different");
    assert!(!Rc::ptr_eq(&first, &other));

    // Interning hits never allocated; only two objects exist.
    assert_eq!(heap.object_count(), 2);
}
