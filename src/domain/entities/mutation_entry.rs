use crate::domain::value_objects::{EntryId, EntryStatus, MutationOperation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pending write against the remote API, replayed in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MutationEntry {
    pub id: EntryId,
    pub operation: MutationOperation,
    /// Serialized request body, passed through to the API as-is (modulo
    /// placeholder id substitution).
    pub payload: Value,
    pub status: EntryStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

impl MutationEntry {
    pub fn new(operation: MutationOperation, payload: Value) -> Self {
        Self {
            id: EntryId::generate(),
            operation,
            payload,
            status: EntryStatus::Pending,
            retry_count: 0,
            created_at: Utc::now(),
            last_error: None,
        }
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = EntryStatus::Failed;
        self.retry_count += 1;
        self.last_error = Some(error.into());
    }

    /// Rewrites every reference to a local placeholder id with the
    /// server-assigned id, both in the typed target ref and inside the
    /// opaque payload body.
    pub fn substitute_placeholder(&mut self, local_id: &str, server_id: &str) -> bool {
        let mut changed = false;
        if let Some(resolved) = self.operation.target.resolved(local_id, server_id) {
            self.operation.target = resolved;
            changed = true;
        }
        changed |= substitute_in_value(&mut self.payload, local_id, server_id);
        changed
    }
}

fn substitute_in_value(value: &mut Value, local_id: &str, server_id: &str) -> bool {
    match value {
        Value::String(s) if s == local_id => {
            *s = server_id.to_string();
            true
        }
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |acc, v| substitute_in_value(v, local_id, server_id) || acc),
        Value::Object(map) => map
            .values_mut()
            .fold(false, |acc, v| substitute_in_value(v, local_id, server_id) || acc),
        _ => false,
    }
}
