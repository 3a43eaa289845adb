//! Standing query model
//!
//! The filter/order/limit subset the external store supports: equality,
//! inequality and less-than on (possibly dotted) field paths, multi-key
//! ordering, and a result limit. Queries are plain data so the same value
//! drives both a one-shot read and a live subscription.

use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator on a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
}

/// One field predicate
#[derive(Debug, Clone)]
pub struct Filter {
    pub path: String,
    pub op: FilterOp,
    pub value: Value,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub path: String,
    pub direction: Direction,
}

/// A filtered/sorted/limited query against one flat collection
#[derive(Debug, Clone)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Convenience: a single document by id (ids are materialized into
    /// every document under the `id` field)
    pub fn doc(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::collection(collection)
            .where_eq("id", Value::String(id.into()))
            .with_limit(1)
    }

    pub fn where_eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            path: path.into(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    pub fn where_ne(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            path: path.into(),
            op: FilterOp::Ne,
            value: value.into(),
        });
        self
    }

    pub fn where_lt(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            path: path.into(),
            op: FilterOp::Lt,
            value: value.into(),
        });
        self
    }

    pub fn order_by_asc(mut self, path: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            path: path.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, path: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            path: path.into(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document satisfies every filter. Documents missing a
    /// filtered field never match, including for `!=` (the store indexes
    /// only present fields).
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| {
            let Some(actual) = field_path(doc, &f.path) else {
                return false;
            };
            match f.op {
                FilterOp::Eq => actual == &f.value,
                FilterOp::Ne => actual != &f.value,
                FilterOp::Lt => {
                    matches!(compare_values(actual, &f.value), Some(Ordering::Less))
                }
            }
        })
    }

    /// Sort and truncate a matched result set in place
    pub fn apply_order_and_limit(&self, docs: &mut Vec<Value>) {
        if !self.order_by.is_empty() {
            docs.sort_by(|a, b| {
                for key in &self.order_by {
                    let av = field_path(a, &key.path);
                    let bv = field_path(b, &key.path);
                    let ord = match (av, bv) {
                        (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                        (None, Some(_)) => Ordering::Less,
                        (Some(_), None) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    };
                    let ord = match key.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
    }
}

/// Resolve a dotted field path ("tableStatus.T1.status") within a document
pub fn field_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Total-ish ordering over the scalar values the store sorts on.
/// RFC3339 timestamps are strings and compare chronologically.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x.as_f64().partial_cmp(&y.as_f64())
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
