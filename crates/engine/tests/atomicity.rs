//! All-or-nothing properties of the composite coordinator.
//!
//! Random batches over a small key space, run against the compensating
//! (memory) backend: a batch with a guaranteed failure must leave the
//! store byte-identical to its pre-batch state, and an all-write batch
//! must commit to exactly the last value written per key.

use cairn_core::{KeyValueBackend, Operation};
use cairn_engine::{execute, BatchError};
use cairn_storage::MemoryStore;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn key_strategy() -> impl Strategy<Value = String> {
    (0..6u8).prop_map(|i| format!("k{}", i))
}

fn op_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        key_strategy().prop_map(Operation::read),
        (key_strategy(), "[a-z]{0,8}").prop_map(|(k, v)| Operation::write(k, v)),
        key_strategy().prop_map(Operation::delete),
    ]
}

proptest! {
    #[test]
    fn failing_batch_leaves_store_unchanged(
        seed in prop::collection::vec((key_strategy(), "[a-z]{0,8}"), 0..6),
        ops in prop::collection::vec(op_strategy(), 0..12),
        fail_at in 0..13usize,
    ) {
        let store = MemoryStore::new();
        for (k, v) in &seed {
            store.put(k, v).unwrap();
        }
        let before = store.entries();

        // inject one operation that must fail: the generated key space
        // never produces this key, so the delete always hits NotFound
        let mut ops = ops;
        let idx = fail_at.min(ops.len());
        ops.insert(idx, Operation::delete("never-present"));

        let err = execute(&store, ops).unwrap_err();
        prop_assert!(matches!(err, BatchError::Execution { .. }), "expected Execution error");
        prop_assert_eq!(store.entries(), before);
    }

    #[test]
    fn all_write_batch_commits_last_value_per_key(
        writes in prop::collection::vec((key_strategy(), "[a-z]{0,8}"), 1..12),
    ) {
        let store = MemoryStore::new();
        let ops: Vec<Operation> = writes
            .iter()
            .map(|(k, v)| Operation::write(k.clone(), v.clone()))
            .collect();

        let reports = execute(&store, ops).unwrap();
        prop_assert_eq!(reports.len(), writes.len());

        let mut expected = BTreeMap::new();
        for (k, v) in &writes {
            expected.insert(k.clone(), v.clone());
        }
        let actual: BTreeMap<String, String> = store.entries().into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn reports_match_input_positions(
        ops in prop::collection::vec(op_strategy(), 1..12),
    ) {
        let store = MemoryStore::new();
        store.put("k0", "seed").unwrap();

        let keys: Vec<String> = ops.iter().map(|o| o.key.clone()).collect();
        let reports = match execute(&store, ops) {
            Ok(reports) => reports,
            Err(err) => err.reports().to_vec(),
        };

        prop_assert_eq!(reports.len(), keys.len());
        for (i, report) in reports.iter().enumerate() {
            prop_assert_eq!(report.sequence, i as u64 + 1);
            prop_assert_eq!(&report.key, &keys[i]);
        }
    }
}
