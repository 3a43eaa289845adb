//! Atomic multi-document write batches
//!
//! A batch is validated and applied as a unit: any failing operation
//! aborts the whole commit with no observable partial state. This is what
//! keeps "create order + flip table occupancy" indivisible.

use serde_json::{json, Value};

/// Sentinel replaced with one commit-wide server instant at commit time
pub fn server_timestamp() -> Value {
    json!({ "$serverTimestamp": true })
}

pub(crate) fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("$serverTimestamp"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// A single field mutation within an update
#[derive(Debug, Clone)]
pub enum FieldWrite {
    /// Set the field (dotted paths create intermediate objects)
    Set(Value),
    /// Remove the field entirely (used when the owner deletes a table)
    Delete,
}

/// One operation in a batch
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Create a document; fails the batch if the id already exists.
    /// Idempotency records rely on this.
    Create {
        collection: String,
        id: String,
        data: Value,
    },
    /// Create or replace unconditionally
    Set {
        collection: String,
        id: String,
        data: Value,
    },
    /// Merge field writes into an existing document; fails if absent
    Update {
        collection: String,
        id: String,
        fields: Vec<(String, FieldWrite)>,
    },
    /// Delete a document (no-op if absent, matching the purge semantics)
    Delete { collection: String, id: String },
}

/// An ordered list of operations committed atomically
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub(crate) ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn create(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Value,
    ) -> Self {
        self.ops.push(WriteOp::Create {
            collection: collection.into(),
            id: id.into(),
            data,
        });
        self
    }

    pub fn set(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Value,
    ) -> Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            data,
        });
        self
    }

    pub fn update(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        fields: Vec<(String, Value)>,
    ) -> Self {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            fields: fields
                .into_iter()
                .map(|(path, value)| (path, FieldWrite::Set(value)))
                .collect(),
        });
        self
    }

    /// Update that removes a field (dotted path allowed)
    pub fn update_delete_field(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            fields: vec![(path.into(), FieldWrite::Delete)],
        });
        self
    }

    pub fn delete(mut self, collection: impl Into<String>, id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }
}

/// Apply one field write to a document, creating intermediate objects
/// along the dotted path.
pub(crate) fn apply_field_write(doc: &mut Value, path: &str, write: &FieldWrite) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = doc;
    for segment in &segments[..segments.len() - 1] {
        if !current.is_object() {
            *current = json!({});
        }
        current = current
            .as_object_mut()
            .expect("just ensured object")
            .entry(segment.to_string())
            .or_insert_with(|| json!({}));
    }
    let last = segments[segments.len() - 1];
    if !current.is_object() {
        *current = json!({});
    }
    let obj = current.as_object_mut().expect("just ensured object");
    match write {
        FieldWrite::Set(value) => {
            obj.insert(last.to_string(), value.clone());
        }
        FieldWrite::Delete => {
            obj.remove(last);
        }
    }
}
