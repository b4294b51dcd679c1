pub mod datetime;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod writes;

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;
pub use store::{Cell, NewRow, RecordStore, StoreError, StoreErrorKind, StoreResult, Table};
pub use writes::{submit_entry, WriteReceipt};

/// Store selected at startup: Postgres when `DATABASE_URL` is set,
/// otherwise the in-memory store.
#[derive(Clone)]
pub enum Backend {
    Postgres(PgRecordStore),
    Memory(InMemoryRecordStore),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Postgres(_) => "postgres",
            Backend::Memory(_) => "memory",
        }
    }
}

impl RecordStore for Backend {
    async fn insert(&self, row: NewRow) -> StoreResult<()> {
        match self {
            Backend::Postgres(store) => store.insert(row).await,
            Backend::Memory(store) => store.insert(row).await,
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match self {
            Backend::Postgres(store) => store.ping().await,
            Backend::Memory(store) => store.ping().await,
        }
    }
}
