//! Extraction semantics: move when uniquely owned, clone when shared.

use std::cell::Cell;
use std::rc::Rc;

use crate::{KeyNotFound, LazyMap};

/// Value type that counts clones, for asserting the move/copy matrix.
#[derive(Debug, PartialEq)]
struct Tracked {
    payload: Vec<i32>,
    clones: Rc<Cell<u32>>,
}

impl Tracked {
    fn new(payload: Vec<i32>, clones: &Rc<Cell<u32>>) -> Self {
        Self {
            payload,
            clones: Rc::clone(clones),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.clones.set(self.clones.get() + 1);
        Self {
            payload: self.payload.clone(),
            clones: Rc::clone(&self.clones),
        }
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self {
            payload: Vec::new(),
            clones: Rc::new(Cell::new(0)),
        }
    }
}

#[test]
fn take_moves_from_unique_leaf() {
    let clones = Rc::new(Cell::new(0));
    let mut m = LazyMap::new();
    m.insert(10, Tracked::new(vec![1, 2, 3], &clones));
    m.insert(20, Tracked::new(vec![4, 5, 6], &clones));

    let mut v = m.take(&20).expect("key exists");
    assert_eq!(clones.get(), 0, "unique local extraction must not clone");
    assert_eq!(v.payload, vec![4, 5, 6]);

    // the slot holds the default until reassigned; the key stays live
    assert!(m.contains_key(&20));
    assert_eq!(m.len(), 2);
    assert!(m.get(&20).expect("still resident").payload.is_empty());

    v.payload.push(7);
    m.insert_or_assign(20, v);
    assert_eq!(m.get(&20).expect("reassigned").payload, vec![4, 5, 6, 7]);
    assert_eq!(clones.get(), 0);
}

#[test]
fn take_copies_when_shared() {
    let clones = Rc::new(Cell::new(0));
    let mut m = LazyMap::new();
    m.insert(10, Tracked::new(vec![1, 2, 3], &clones));
    let m2 = m.clone();

    let v = m.take(&10).expect("key exists");
    assert_eq!(clones.get(), 1, "shared extraction must clone exactly once");
    assert_eq!(v.payload, vec![1, 2, 3]);

    // both handles still see the original value
    assert_eq!(m.get(&10).expect("untouched").payload, vec![1, 2, 3]);
    assert_eq!(m2.get(&10).expect("untouched").payload, vec![1, 2, 3]);
}

#[test]
fn take_copies_when_key_lives_in_ancestor() {
    let clones = Rc::new(Cell::new(0));
    let mut m = LazyMap::new();
    m.insert(10, Tracked::new(vec![1], &clones));
    let fork = m.clone();
    m.insert(11, Tracked::new(vec![2], &clones)); // branches; 10 stays upward
    drop(fork);

    let v = m.take(&10).expect("key exists");
    assert_eq!(clones.get(), 1, "ancestor-resident value must be cloned");
    assert_eq!(v.payload, vec![1]);
    assert_eq!(m.get(&10).expect("untouched").payload, vec![1]);
}

#[test]
fn take_missing_key_fails() {
    let mut m: LazyMap<i32, Tracked> = LazyMap::new();
    assert_eq!(m.take(&1).unwrap_err(), KeyNotFound);
}

#[test]
fn take_unique_refuses_when_shared() {
    let clones = Rc::new(Cell::new(0));
    let mut m = LazyMap::new();
    m.insert(10, Tracked::new(vec![1], &clones));

    let moved = m.take_unique(&10).expect("key exists");
    assert!(moved.is_some(), "unique leaf must allow the move");
    assert_eq!(clones.get(), 0);

    m.insert_or_assign(10, Tracked::new(vec![2], &clones));
    let m2 = m.clone();
    assert_eq!(m.take_unique(&10), Ok(None), "shared leaf must refuse");
    assert_eq!(clones.get(), 0, "a refused move must not clone");
    assert_eq!(m.take_unique(&99), Err(KeyNotFound));
    assert_eq!(m2.get(&10).expect("untouched").payload, vec![2]);
}

/// `take_unique` demands no `Clone` at all — move-only values work.
#[test]
fn take_unique_works_without_clone() {
    let mut m: LazyMap<i32, Option<Box<i32>>> = LazyMap::new();
    m.insert(10, None);
    m.insert(20, Some(Box::new(6)));

    let slot = m
        .take_unique(&20)
        .expect("key exists")
        .expect("leaf is unique");
    let mut boxed = slot.expect("value present");
    *boxed = 7;
    m.insert_or_assign(20, Some(boxed));
    assert_eq!(m.get(&20), Some(&Some(Box::new(7))));

    let m2 = m.clone();
    assert_eq!(m.take_unique(&20), Ok(None));
    drop(m2);
}

/// Scenario from the read-modify-write loop the operation exists for.
#[test]
fn read_modify_write_round_trip() {
    let mut m = LazyMap::from([(10, vec![1, 2, 3]), (20, vec![4, 5, 6])]);

    let mut v = m.take(&20).expect("key exists");
    v.push(7);
    m.insert_or_assign(20, v);
    assert_eq!(m.get(&20), Some(&vec![4, 5, 6, 7]));

    let m2 = m.clone();
    let v2 = m.take(&10).expect("key exists");
    assert_eq!(v2, vec![1, 2, 3]);
    assert_eq!(m.get(&10), Some(&vec![1, 2, 3]), "copy path leaves the map intact");
    assert_eq!(m2.get(&10), Some(&vec![1, 2, 3]));
}
