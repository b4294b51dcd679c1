use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::gateway::store::{NewRow, RecordStore, StoreError, StoreResult};

/// Process-local store used when no database is configured, and as the
/// test double. Failures can be scheduled for a given insert call number
/// (1-based).
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<NewRow>,
    calls: usize,
    failures: HashMap<usize, StoreError>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `call`-th insert fail with `error` instead of persisting.
    pub fn fail_on_call(&self, call: usize, error: StoreError) {
        self.lock().failures.insert(call, error);
    }

    pub fn rows(&self) -> Vec<NewRow> {
        self.lock().rows.clone()
    }

    /// Number of insert attempts, successful or not.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test panicked mid-insert; the data is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, row: NewRow) -> StoreResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        let call = state.calls;
        if let Some(err) = state.failures.remove(&call) {
            return Err(err);
        }
        tracing::debug!(table = %row.table, call, "In-memory insert");
        state.rows.push(row);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
