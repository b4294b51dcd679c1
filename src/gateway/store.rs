use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::future::Future;
use uuid::Uuid;

use crate::gateway::datetime::canonical_timestamp;

/// Logical backend tables written by the record pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    HealthMetrics,
    Meals,
    Symptoms,
    SleepLogs,
    MoodLogs,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::HealthMetrics => "health_metrics",
            Table::Meals => "meals",
            Table::Symptoms => "symptoms",
            Table::SleepLogs => "sleep_logs",
            Table::MoodLogs => "mood_logs",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column value. Timestamps serialize in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Uuid(Uuid),
    Text(String),
    OptionalText(Option<String>),
    Int(i32),
    Float(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Uuid(v) => v.serialize(serializer),
            Cell::Text(v) => serializer.serialize_str(v),
            Cell::OptionalText(v) => v.serialize(serializer),
            Cell::Int(v) => serializer.serialize_i32(*v),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Date(v) => serializer.serialize_str(&v.format("%Y-%m-%d").to_string()),
            Cell::Timestamp(v) => serializer.serialize_str(&canonical_timestamp(v)),
        }
    }
}

/// Column name → value mapping for one insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRow {
    pub table: Table,
    pub cells: Vec<(&'static str, Cell)>,
}

impl NewRow {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            cells: Vec::new(),
        }
    }

    pub fn with(mut self, column: &'static str, value: Cell) -> Self {
        self.cells.push((column, value));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cell)| cell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    /// Row rejected by a table constraint.
    Constraint,
    /// Backend could not be reached.
    Unavailable,
    /// Value could not be mapped onto a column.
    InvalidInput,
    Unknown,
}

/// Structured backend failure; `message` is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) => {
                let kind = if db_err.constraint().is_some() {
                    StoreErrorKind::Constraint
                } else {
                    StoreErrorKind::Unknown
                };
                StoreError::new(kind, db_err.message())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::new(StoreErrorKind::Unavailable, e.to_string())
            }
            _ => StoreError::new(StoreErrorKind::Unknown, e.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Insert-only access to the record tables.
pub trait RecordStore: Send + Sync {
    fn insert(&self, row: NewRow) -> impl Future<Output = StoreResult<()>> + Send;

    /// Cheap reachability probe used by readiness checks.
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
