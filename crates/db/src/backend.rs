//! Table and storage traits plus the shared [`Backend`] handle.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::BackendError;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// A row filter, mirroring the platform's `eq` / `in` operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    In { column: String, values: Vec<String> },
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn any_of<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } => column,
        }
    }

    /// Whether a JSON row satisfies this filter. Cells compare by their
    /// string form, so `"id": "<uuid>"` matches `Filter::eq("id", uuid)`.
    pub fn matches(&self, row: &Value) -> bool {
        let Some(cell) = row.get(self.column()).map(cell_text) else {
            return false;
        };
        match self {
            Filter::Eq { value, .. } => cell.as_deref() == Some(value.as_str()),
            Filter::In { values, .. } => cell.is_some_and(|c| values.iter().any(|v| *v == c)),
        }
    }

    /// PostgREST query operator, e.g. `eq.abc` or `in.("a","b")`.
    pub fn to_postgrest(&self) -> (String, String) {
        match self {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{value}")),
            Filter::In { column, values } => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
                    .collect();
                (column.clone(), format!("in.({})", quoted.join(",")))
            }
        }
    }
}

/// String form of a JSON cell; `None` for `null`.
pub(crate) fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Sort order for a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }

    pub fn to_postgrest(&self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{}.{direction}", self.column)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Row-level access to the platform's tables.
///
/// Rows travel as JSON objects; the repositories convert them to models.
/// Every write returns the affected rows.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, BackendError>;

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError>;

    /// Apply `patch` to every row matching all `filters`.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BackendError>;

    /// Insert rows, merging into existing rows that share a primary key.
    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError>;

    /// Delete every row matching all `filters`.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BackendError>;
}

/// Options for a single object upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub content_type: String,
    /// `Cache-Control: max-age` for the stored object.
    pub cache_control_secs: Option<u32>,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

impl UploadOptions {
    pub fn new(content_type: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            cache_control_secs: None,
            upsert: false,
        }
    }

    pub fn cache_control(mut self, secs: u32) -> Self {
        self.cache_control_secs = Some(secs);
        self
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

/// Object storage scoped to one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    async fn upload(
        &self,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> Result<(), BackendError>;

    /// Public URL of an object. Never fails; the object need not exist.
    fn public_url(&self, path: &str) -> String;

    /// Remove objects. Paths that do not exist are ignored.
    async fn remove(&self, paths: &[String]) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cheaply cloneable handle to the platform, shared through app state.
#[derive(Clone)]
pub struct Backend {
    tables: Arc<dyn TableStore>,
    storage: Arc<dyn ObjectStore>,
}

impl Backend {
    pub fn new(tables: Arc<dyn TableStore>, storage: Arc<dyn ObjectStore>) -> Self {
        Self { tables, storage }
    }

    /// Use one value for both tables and storage.
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: TableStore + ObjectStore + 'static,
    {
        Self {
            tables: backend.clone(),
            storage: backend,
        }
    }

    pub fn tables(&self) -> &dyn TableStore {
        self.tables.as_ref()
    }

    pub fn storage(&self) -> &dyn ObjectStore {
        self.storage.as_ref()
    }
}
