//! The ordered forward pass.
//!
//! Entries run strictly in ascending sequence order, which is the order
//! they sit in the vector, so a plain iteration suffices; there is no
//! reordering and no intra-batch parallelism, because later operations
//! may depend on key states left by earlier ones.
//!
//! A failure does not stop the pass: every entry is attempted and its
//! outcome recorded, and only after the full pass does the coordinator
//! decide between commit and rollback.

use crate::batch::{Batch, BatchState};
use crate::handle::StoreHandle;
use crate::preimage;
use cairn_core::OpKind;

pub(crate) fn run(store: &mut StoreHandle<'_>, batch: &mut Batch) {
    batch.state = BatchState::Executing;

    for entry in batch.entries.iter_mut() {
        let key = entry.operation.key.clone();
        match entry.operation.kind {
            OpKind::Read => match store.get(&key) {
                Ok(value) => entry.mark_executed(Some(value)),
                Err(e) => entry.mark_failed(e.to_string()),
            },
            OpKind::Write => {
                let Some(value) = entry.operation.value.clone() else {
                    // validation guarantees a payload; a bare write must
                    // not reach the store
                    entry.mark_failed("write operation has no payload");
                    continue;
                };
                match preimage::capture(store, &key) {
                    Ok(pre) => {
                        entry.pre_image = Some(pre);
                        match store.put(&key, &value) {
                            Ok(()) => entry.mark_executed(Some(value)),
                            Err(e) => entry.mark_failed(e.to_string()),
                        }
                    }
                    // no pre-image captured: the mutation is not applied
                    Err(e) => entry.mark_failed(e.to_string()),
                }
            }
            OpKind::Delete => match preimage::capture(store, &key) {
                Ok(pre) => {
                    entry.pre_image = Some(pre);
                    match store.delete(&key) {
                        Ok(()) => entry.mark_executed(None),
                        Err(e) => entry.mark_failed(e.to_string()),
                    }
                }
                Err(e) => entry.mark_failed(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Outcome, PreImage};
    use cairn_core::{KeyValueBackend, Operation};
    use cairn_storage::MemoryStore;

    fn run_against(store: &MemoryStore, ops: Vec<Operation>) -> Batch {
        let mut batch = Batch::build(ops);
        let mut handle = StoreHandle::Direct(store);
        run(&mut handle, &mut batch);
        batch
    }

    #[test]
    fn read_of_present_key_returns_its_value() {
        let store = MemoryStore::new();
        store.put("k", "v").unwrap();
        let batch = run_against(&store, vec![Operation::read("k")]);
        assert!(batch.entries[0].executed());
        assert_eq!(batch.entries[0].result_value.as_deref(), Some("v"));
        assert!(batch.entries[0].pre_image.is_none());
    }

    #[test]
    fn read_of_absent_key_fails_the_entry() {
        let store = MemoryStore::new();
        let batch = run_against(&store, vec![Operation::read("k")]);
        assert!(batch.entries[0].failed());
        assert!(batch.has_failures());
    }

    #[test]
    fn write_applies_and_echoes_the_payload() {
        let store = MemoryStore::new();
        let batch = run_against(&store, vec![Operation::write("k", "v")]);
        assert!(batch.entries[0].executed());
        assert_eq!(batch.entries[0].result_value.as_deref(), Some("v"));
        assert_eq!(store.get("k").unwrap(), "v");
    }

    #[test]
    fn write_over_absent_key_captures_absent() {
        let store = MemoryStore::new();
        let batch = run_against(&store, vec![Operation::write("k", "v")]);
        assert_eq!(batch.entries[0].pre_image, Some(PreImage::Absent));
    }

    #[test]
    fn write_over_present_key_captures_old_value() {
        let store = MemoryStore::new();
        store.put("k", "old").unwrap();
        let batch = run_against(&store, vec![Operation::write("k", "new")]);
        assert_eq!(
            batch.entries[0].pre_image,
            Some(PreImage::Present("old".to_string()))
        );
        assert_eq!(store.get("k").unwrap(), "new");
    }

    #[test]
    fn delete_of_absent_key_fails_without_mutating() {
        let store = MemoryStore::new();
        let batch = run_against(&store, vec![Operation::delete("k")]);
        assert!(batch.entries[0].failed());
        assert!(store.is_empty());
    }

    #[test]
    fn failure_does_not_short_circuit_later_entries() {
        let store = MemoryStore::new();
        let batch = run_against(
            &store,
            vec![
                Operation::delete("missing"),
                Operation::write("k", "v"),
                Operation::read("k"),
            ],
        );
        assert!(batch.entries[0].failed());
        assert!(batch.entries[1].executed());
        assert!(batch.entries[2].executed());
        assert_eq!(batch.entries[2].result_value.as_deref(), Some("v"));
    }

    #[test]
    fn same_key_twice_captures_per_entry_views() {
        let store = MemoryStore::new();
        let batch = run_against(
            &store,
            vec![Operation::write("k", "v1"), Operation::write("k", "v2")],
        );
        assert_eq!(batch.entries[0].pre_image, Some(PreImage::Absent));
        assert_eq!(
            batch.entries[1].pre_image,
            Some(PreImage::Present("v1".to_string()))
        );
        assert_eq!(store.get("k").unwrap(), "v2");
    }

    #[test]
    fn read_in_batch_observes_earlier_write() {
        let store = MemoryStore::new();
        let batch = run_against(
            &store,
            vec![Operation::write("a", "1"), Operation::read("a")],
        );
        assert_eq!(batch.entries[1].result_value.as_deref(), Some("1"));
    }

    #[test]
    fn bare_write_fails_without_touching_the_store() {
        let store = MemoryStore::new();
        let op = Operation {
            key: "k".to_string(),
            kind: cairn_core::OpKind::Write,
            value: None,
        };
        let batch = run_against(&store, vec![op]);
        assert_eq!(
            batch.entries[0].outcome,
            Some(Outcome::Failed("write operation has no payload".to_string()))
        );
        assert!(store.is_empty());
    }
}
