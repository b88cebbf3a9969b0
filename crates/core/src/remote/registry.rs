//! Keyed table of in-flight remote operations.

use dashmap::DashMap;
use trackvault_domain::{Operation, OperationId, OperationPatch};

/// Concurrent registry of operations currently owned by a retry loop.
///
/// Entries are inserted when a call enters the executor and removed as soon
/// as it reaches a terminal status, so a snapshot only ever shows work that
/// is still pending or retrying (or finishing right now).
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: DashMap<OperationId, Operation>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `operation.id`.
    pub fn register(&self, operation: Operation) {
        self.operations.insert(operation.id, operation);
    }

    /// Apply `patch` to a registered record. Returns `false` for unknown ids.
    pub fn update(&self, id: &OperationId, patch: &OperationPatch) -> bool {
        match self.operations.get_mut(id) {
            Some(mut entry) => {
                entry.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &OperationId) -> Option<Operation> {
        self.operations.remove(id).map(|(_, operation)| operation)
    }

    pub fn get(&self, id: &OperationId) -> Option<Operation> {
        self.operations.get(id).map(|entry| entry.value().clone())
    }

    /// Copy of every record, oldest first.
    pub fn snapshot(&self) -> Vec<Operation> {
        let mut operations: Vec<Operation> =
            self.operations.iter().map(|entry| entry.value().clone()).collect();
        operations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn clear(&self) {
        self.operations.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use trackvault_domain::{new_operation_id, OperationKind, OperationStatus};

    use super::*;

    #[test]
    fn register_update_remove() {
        let registry = OperationRegistry::new();
        let id = new_operation_id();
        registry.register(Operation::new(id, OperationKind::Read, "GET /library"));

        let patch = OperationPatch::status(OperationStatus::Retrying)
            .with_retry_count(1)
            .with_error("HTTP 503: busy");
        assert!(registry.update(&id, &patch));

        let stored = registry.get(&id).unwrap();
        assert_eq!(stored.status, OperationStatus::Retrying);
        assert_eq!(stored.retry_count, 1);
        assert_eq!(stored.last_error.as_deref(), Some("HTTP 503: busy"));

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(registry.is_empty());
        assert!(registry.remove(&id).is_none());
    }

    #[test]
    fn update_of_unknown_id_is_reported() {
        let registry = OperationRegistry::new();
        let patch = OperationPatch::status(OperationStatus::Failed);
        assert!(!registry.update(&new_operation_id(), &patch));
    }

    #[test]
    fn snapshot_is_ordered_by_creation_time() {
        let registry = OperationRegistry::new();
        let now = Utc::now();

        let mut late = Operation::new(new_operation_id(), OperationKind::Write, "POST /playlists");
        late.created_at = now;
        let mut early = Operation::new(new_operation_id(), OperationKind::Read, "GET /library");
        early.created_at = now - Duration::seconds(5);

        registry.register(late.clone());
        registry.register(early.clone());

        let endpoints: Vec<String> =
            registry.snapshot().into_iter().map(|operation| operation.endpoint).collect();
        assert_eq!(endpoints, vec!["GET /library".to_string(), "POST /playlists".to_string()]);
        assert_eq!(registry.snapshot(), registry.snapshot());
    }

    #[test]
    fn clear_drops_everything() {
        let registry = OperationRegistry::new();
        for _ in 0..3 {
            registry.register(Operation::new(new_operation_id(), OperationKind::Delete, "x"));
        }
        assert_eq!(registry.len(), 3);
        registry.clear();
        assert!(registry.is_empty());
    }
}
