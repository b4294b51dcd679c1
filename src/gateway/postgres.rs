use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::gateway::store::{Cell, NewRow, RecordStore, StoreResult};

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `INSERT INTO <table> (<columns>) VALUES ($1, ..)`. Table and column
/// names come from `Table` and static column literals, never from input.
fn build_insert(row: NewRow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
    qb.push(row.table.as_str());
    qb.push(" (");
    {
        let mut columns = qb.separated(", ");
        for (name, _) in &row.cells {
            columns.push(*name);
        }
    }
    qb.push(") VALUES (");
    {
        let mut values = qb.separated(", ");
        for (_, cell) in row.cells {
            match cell {
                Cell::Uuid(v) => values.push_bind(v),
                Cell::Text(v) => values.push_bind(v),
                Cell::OptionalText(v) => values.push_bind(v),
                Cell::Int(v) => values.push_bind(v),
                Cell::Float(v) => values.push_bind(v),
                Cell::Date(v) => values.push_bind(v),
                Cell::Timestamp(v) => values.push_bind(v),
            };
        }
    }
    qb.push(")");
    qb
}

impl RecordStore for PgRecordStore {
    async fn insert(&self, row: NewRow) -> StoreResult<()> {
        let table = row.table;
        let mut qb = build_insert(row);
        let result = qb.build().execute(&self.pool).await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(table = %table, error = %e, "Insert failed");
                Err(e.into())
            }
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
