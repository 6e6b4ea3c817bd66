//! Generative invariants, checked against a standard `HashMap` model.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::LazyMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, i32),
    Assign(u8, i32),
    Remove(u8),
    Take(u8),
    Fork,
    Detach,
    Clear,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (any::<u8>(), any::<i32>()).prop_map(|(k, v)| Op::Assign(k, v)),
        any::<u8>().prop_map(Op::Remove),
        any::<u8>().prop_map(Op::Take),
        Just(Op::Fork),
        Just(Op::Detach),
        Just(Op::Clear),
    ]
}

fn arbitrary_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arbitrary_op(), 0..40)
}

proptest! {
    /// Any operation sequence agrees with a `HashMap` model, the structural
    /// invariants hold after every step, and forked handles keep observing
    /// their snapshot.
    #[test]
    fn prop_matches_model(ops in arbitrary_ops()) {
        let mut map: LazyMap<u8, i32> = LazyMap::new();
        let mut model: HashMap<u8, i32> = HashMap::new();
        let mut forks: Vec<(LazyMap<u8, i32>, HashMap<u8, i32>)> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                }
                Op::Assign(k, v) => {
                    map.insert_or_assign(k, v);
                    model.insert(k, v);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k).is_some());
                }
                Op::Take(k) => {
                    let expected = model.get(&k).copied();
                    match map.take(&k) {
                        Ok(v) => {
                            prop_assert_eq!(Some(v), expected);
                            map.insert_or_assign(k, v);
                        }
                        Err(_) => prop_assert!(expected.is_none()),
                    }
                }
                Op::Fork => {
                    forks.push((map.clone(), model.clone()));
                }
                Op::Detach => {
                    map.detach();
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            map.check_invariants();
            prop_assert_eq!(map.len(), model.len());
        }

        let collected: HashMap<u8, i32> = map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&collected, &model);

        let seen: Vec<u8> = map.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(seen.len(), map.len(), "a key surfaced twice");

        for (fork, snapshot) in &forks {
            fork.check_invariants();
            let got: HashMap<u8, i32> = fork.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(&got, snapshot);
        }
    }
}

proptest! {
    /// Detaching never changes the observable map.
    #[test]
    fn prop_detach_preserves_value(
        entries in prop::collection::vec((any::<u8>(), any::<i32>()), 0..40),
        extra in prop::collection::vec((any::<u8>(), any::<i32>()), 0..20),
    ) {
        let base: LazyMap<u8, i32> = entries.into_iter().collect();
        let mut map = base.clone();
        for (k, v) in extra {
            map.insert_or_assign(k, v);
        }

        let before: HashMap<u8, i32> = map.iter().map(|(k, v)| (*k, *v)).collect();
        map.detach();

        prop_assert!(map.is_detached());
        prop_assert_eq!(map.len(), before.len());
        let after: HashMap<u8, i32> = map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);
        map.check_invariants();
        base.check_invariants();
    }
}
