//! In-process implementation of the platform, for local development and
//! tests.
//!
//! Emulates the parts of the hosted platform the lab relies on: generated
//! ids and timestamps, the `artist_id` foreign keys with `ON DELETE CASCADE`,
//! upsert by primary key, and storage that refuses to overwrite unless
//! asked to. Every call is recorded in an operation log, and failures can be
//! injected per table or per object path.

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::backend::{cell_text, Filter, ObjectStore, Order, TableStore, UploadOptions};
use crate::error::BackendError;
use crate::tables;

/// Base URL used for public object URLs.
pub const MEMORY_PUBLIC_BASE: &str = "http://memory.local";

/// Operations kept in the log by default; older entries are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 10_000;

/// One recorded call against the in-memory platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Select { table: String },
    Insert { table: String },
    Update { table: String },
    Upsert { table: String },
    Delete { table: String, ids: Vec<String> },
    Upload { path: String },
    Remove { paths: Vec<String> },
}

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control_secs: Option<u32>,
}

/// Which call an injected failure applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FaultTarget {
    Insert { table: String },
    Update { table: String },
    Upsert { table: String },
    Delete { table: String },
    /// Uploads whose path contains the given text.
    Upload { path_contains: String },
    Remove,
}

#[derive(Debug, Clone)]
struct Fault {
    target: FaultTarget,
    message: String,
    /// How many more calls fail; `None` fails forever.
    remaining: Option<usize>,
}

struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    objects: BTreeMap<String, StoredObject>,
    log: VecDeque<Operation>,
    log_capacity: usize,
    faults: Vec<Fault>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            objects: BTreeMap::new(),
            log: VecDeque::new(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            faults: Vec::new(),
        }
    }
}

impl MemoryState {
    /// Append to the operation log, dropping the oldest entry when full.
    fn record(&mut self, op: Operation) {
        if self.log_capacity == 0 {
            return;
        }
        if self.log.len() == self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(op);
    }

    /// Consume a matching fault, if one is armed.
    fn take_fault(&mut self, target: &FaultTarget) -> Option<BackendError> {
        let idx = self.faults.iter().position(|f| match (&f.target, target) {
            (
                FaultTarget::Upload { path_contains },
                FaultTarget::Upload {
                    path_contains: path,
                },
            ) => path.contains(path_contains.as_str()),
            (a, b) => a == b,
        })?;

        let err = BackendError::Api {
            status: 500,
            code: Some("INJECTED".to_string()),
            message: self.faults[idx].message.clone(),
        };
        match self.faults[idx].remaining {
            Some(n) if n <= 1 => {
                self.faults.remove(idx);
            }
            Some(n) => self.faults[idx].remaining = Some(n - 1),
            None => {}
        }
        Some(err)
    }

    fn rows(&self, table: &str) -> &[Value] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn artist_exists(&self, id: &str) -> bool {
        self.rows(tables::ARTISTS)
            .iter()
            .any(|row| row.get("id").and_then(cell_text).as_deref() == Some(id))
    }

    /// Reject child rows pointing at a missing artist, like the FK would.
    fn check_foreign_key(&self, table: &str, row: &Map<String, Value>) -> Result<(), BackendError> {
        if !tables::ARTIST_CHILDREN.contains(&table) {
            return Ok(());
        }
        let artist_id = row.get("artist_id").and_then(cell_text);
        match artist_id {
            Some(id) if self.artist_exists(&id) => Ok(()),
            _ => Err(BackendError::Api {
                status: 409,
                code: Some("23503".to_string()),
                message: format!(
                    "insert or update on table \"{table}\" violates foreign key constraint \"{table}_artist_id_fkey\""
                ),
            }),
        }
    }
}

/// The in-memory platform. Cheap to create; share it behind an `Arc`.
pub struct MemoryBackend {
    bucket: String,
    public_base: String,
    state: RwLock<MemoryState>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(artlab_core::naming::DEFAULT_BUCKET)
    }
}

impl MemoryBackend {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            public_base: MEMORY_PUBLIC_BASE.to_string(),
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Keep at most `capacity` operations in the log. Zero disables it.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        let state = self.state.get_mut();
        state.log_capacity = capacity;
        state.log.truncate(capacity);
        self
    }

    // ---- inspection ----

    /// Snapshot of every row in `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.state.read().await.rows(table).to_vec()
    }

    /// Paths of every stored object, sorted.
    pub async fn object_paths(&self) -> Vec<String> {
        self.state.read().await.objects.keys().cloned().collect()
    }

    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.state.read().await.objects.get(path).cloned()
    }

    pub async fn has_object(&self, path: &str) -> bool {
        self.state.read().await.objects.contains_key(path)
    }

    /// Logged calls, oldest first.
    pub async fn operations(&self) -> Vec<Operation> {
        self.state.read().await.log.iter().cloned().collect()
    }

    pub async fn clear_operations(&self) {
        self.state.write().await.log.clear();
    }

    // ---- fault injection ----

    async fn arm(&self, target: FaultTarget, message: &str, times: Option<usize>) {
        self.state.write().await.faults.push(Fault {
            target,
            message: message.to_string(),
            remaining: times,
        });
    }

    /// Fail every insert into `table` with `message`.
    pub async fn fail_inserts(&self, table: &str, message: &str) {
        self.arm(
            FaultTarget::Insert {
                table: table.to_string(),
            },
            message,
            None,
        )
        .await;
    }

    /// Fail the next `times` inserts into `table`.
    pub async fn fail_next_inserts(&self, table: &str, times: usize, message: &str) {
        self.arm(
            FaultTarget::Insert {
                table: table.to_string(),
            },
            message,
            Some(times),
        )
        .await;
    }

    pub async fn fail_updates(&self, table: &str, message: &str) {
        self.arm(
            FaultTarget::Update {
                table: table.to_string(),
            },
            message,
            None,
        )
        .await;
    }

    pub async fn fail_upserts(&self, table: &str, message: &str) {
        self.arm(
            FaultTarget::Upsert {
                table: table.to_string(),
            },
            message,
            None,
        )
        .await;
    }

    pub async fn fail_deletes(&self, table: &str, message: &str) {
        self.arm(
            FaultTarget::Delete {
                table: table.to_string(),
            },
            message,
            None,
        )
        .await;
    }

    /// Fail uploads whose path contains `path_contains`.
    pub async fn fail_uploads(&self, path_contains: &str, message: &str) {
        self.arm(
            FaultTarget::Upload {
                path_contains: path_contains.to_string(),
            },
            message,
            None,
        )
        .await;
    }

    pub async fn fail_removes(&self, message: &str) {
        self.arm(FaultTarget::Remove, message, None).await;
    }

    // ---- helpers ----

    fn now_text() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Columns the platform fills with `now()` when a row omits them.
    fn default_timestamp_columns(table: &str) -> &'static [&'static str] {
        match table {
            tables::ARTISTS => &["created_at", "updated_at"],
            tables::MEDIA => &["created_at"],
            _ => &[],
        }
    }

    fn into_object(table: &str, row: Value) -> Result<Map<String, Value>, BackendError> {
        match row {
            Value::Object(map) => Ok(map),
            other => Err(BackendError::Api {
                status: 400,
                code: Some("PGRST102".to_string()),
                message: format!("Row for {table} must be a JSON object, got {other}"),
            }),
        }
    }

    /// Fill generated columns and validate references for a new row.
    fn prepare_new_row(
        state: &MemoryState,
        table: &str,
        mut row: Map<String, Value>,
    ) -> Result<Value, BackendError> {
        if row.get("id").is_none_or(Value::is_null) {
            row.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
        }
        for column in Self::default_timestamp_columns(table) {
            if row.get(*column).is_none_or(Value::is_null) {
                row.insert((*column).into(), Value::String(Self::now_text()));
            }
        }
        state.check_foreign_key(table, &row)?;

        let id = row.get("id").and_then(cell_text);
        let duplicate = state
            .rows(table)
            .iter()
            .any(|existing| existing.get("id").and_then(cell_text) == id);
        if duplicate {
            return Err(BackendError::Api {
                status: 409,
                code: Some("23505".to_string()),
                message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
            });
        }
        Ok(Value::Object(row))
    }

    fn merge(target: &mut Value, patch: &Map<String, Value>) {
        if let Value::Object(existing) = target {
            for (key, value) in patch {
                existing.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Compare two cells for ordering: timestamps chronologically, everything
/// else by string form, nulls first.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    let a = a.and_then(cell_text);
    let b = b.and_then(cell_text);
    match (&a, &b) {
        (Some(x), Some(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        _ => a.cmp(&b),
    }
}

#[async_trait]
impl TableStore for MemoryBackend {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.write().await;
        state.record(Operation::Select {
            table: table.to_string(),
        });

        let mut rows: Vec<Value> = state
            .rows(table)
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();

        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ord = compare_cells(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.write().await;
        state.record(Operation::Insert {
            table: table.to_string(),
        });
        if let Some(err) = state.take_fault(&FaultTarget::Insert {
            table: table.to_string(),
        }) {
            return Err(err);
        }

        // All-or-nothing, like a single INSERT statement.
        let mut prepared = Vec::with_capacity(rows.len());
        for row in rows {
            let row = Self::into_object(table, row)?;
            prepared.push(Self::prepare_new_row(&state, table, row)?);
        }
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(prepared.iter().cloned());
        Ok(prepared)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BackendError> {
        if filters.is_empty() {
            return Err(BackendError::Unfiltered {
                table: table.to_string(),
            });
        }
        let mut state = self.state.write().await;
        state.record(Operation::Update {
            table: table.to_string(),
        });
        if let Some(err) = state.take_fault(&FaultTarget::Update {
            table: table.to_string(),
        }) {
            return Err(err);
        }

        let patch = Self::into_object(table, patch)?;
        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if filters.iter().all(|f| f.matches(row)) {
                    Self::merge(row, &patch);
                    updated.push(row.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.write().await;
        state.record(Operation::Upsert {
            table: table.to_string(),
        });
        if let Some(err) = state.take_fault(&FaultTarget::Upsert {
            table: table.to_string(),
        }) {
            return Err(err);
        }

        let mut written = Vec::with_capacity(rows.len());
        for row in rows {
            let row = Self::into_object(table, row)?;
            state.check_foreign_key(table, &row)?;

            let id = row.get("id").and_then(cell_text);
            let existing = id.as_ref().and_then(|id| {
                state
                    .rows(table)
                    .iter()
                    .position(|r| r.get("id").and_then(cell_text).as_ref() == Some(id))
            });

            match existing {
                Some(idx) => {
                    let rows = state.tables.entry(table.to_string()).or_default();
                    Self::merge(&mut rows[idx], &row);
                    written.push(rows[idx].clone());
                }
                None => {
                    let new_row = Self::prepare_new_row(&state, table, row)?;
                    state
                        .tables
                        .entry(table.to_string())
                        .or_default()
                        .push(new_row.clone());
                    written.push(new_row);
                }
            }
        }
        Ok(written)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BackendError> {
        if filters.is_empty() {
            return Err(BackendError::Unfiltered {
                table: table.to_string(),
            });
        }
        let mut state = self.state.write().await;
        if let Some(err) = state.take_fault(&FaultTarget::Delete {
            table: table.to_string(),
        }) {
            state.record(Operation::Delete {
                table: table.to_string(),
                ids: Vec::new(),
            });
            return Err(err);
        }

        let rows = state.tables.entry(table.to_string()).or_default();
        let (removed, kept): (Vec<Value>, Vec<Value>) = std::mem::take(rows)
            .into_iter()
            .partition(|row| filters.iter().all(|f| f.matches(row)));
        *rows = kept;

        let ids: Vec<String> = removed
            .iter()
            .filter_map(|row| row.get("id").and_then(cell_text))
            .collect();
        state.record(Operation::Delete {
            table: table.to_string(),
            ids: ids.clone(),
        });

        // ON DELETE CASCADE from artists to every child table.
        if table == tables::ARTISTS && !ids.is_empty() {
            let parent = Filter::any_of("artist_id", &ids);
            for child in tables::ARTIST_CHILDREN {
                if let Some(rows) = state.tables.get_mut(*child) {
                    rows.retain(|row| !parent.matches(row));
                }
            }
        }

        Ok(removed)
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        state.record(Operation::Upload {
            path: path.to_string(),
        });
        if let Some(err) = state.take_fault(&FaultTarget::Upload {
            path_contains: path.to_string(),
        }) {
            return Err(err);
        }
        if !options.upsert && state.objects.contains_key(path) {
            return Err(BackendError::Api {
                status: 400,
                code: Some("Duplicate".to_string()),
                message: "The resource already exists".to_string(),
            });
        }
        state.objects.insert(
            path.to_string(),
            StoredObject {
                body,
                content_type: options.content_type.clone(),
                cache_control_secs: options.cache_control_secs,
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.public_base, self.bucket
        )
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        state.record(Operation::Remove {
            paths: paths.to_vec(),
        });
        if let Some(err) = state.take_fault(&FaultTarget::Remove) {
            return Err(err);
        }
        for path in paths {
            state.objects.remove(path);
        }
        Ok(())
    }
}
