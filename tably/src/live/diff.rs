//! Snapshot diffing
//!
//! Subscriptions redeliver the full result set on every change. Views
//! that want incremental updates (highlight a new ticket, chime on a new
//! request) diff successive snapshots by document id.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// One document-level difference between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added(Value),
    Modified(Value),
    Removed(String),
}

impl Change {
    /// Document id the change applies to
    pub fn id(&self) -> &str {
        match self {
            Change::Added(doc) | Change::Modified(doc) => {
                doc.get("id").and_then(Value::as_str).unwrap_or_default()
            }
            Change::Removed(id) => id,
        }
    }
}

/// Diff two full result sets by document id. Order of the output follows
/// the new snapshot for adds and modifications; removals come last.
pub fn diff_snapshots(previous: &[Value], current: &[Value]) -> Vec<Change> {
    let prev_by_id: HashMap<&str, &Value> = previous
        .iter()
        .filter_map(|doc| doc.get("id").and_then(Value::as_str).map(|id| (id, doc)))
        .collect();

    let mut changes = Vec::new();
    for doc in current {
        let Some(id) = doc.get("id").and_then(Value::as_str) else {
            continue;
        };
        match prev_by_id.get(id) {
            None => changes.push(Change::Added(doc.clone())),
            Some(old) if *old != doc => changes.push(Change::Modified(doc.clone())),
            Some(_) => {}
        }
    }

    let current_ids: HashSet<&str> = current
        .iter()
        .filter_map(|doc| doc.get("id").and_then(Value::as_str))
        .collect();
    for (id, _) in prev_by_id {
        if !current_ids.contains(id) {
            changes.push(Change::Removed(id.to_string()));
        }
    }
    changes
}
