//! Per-request trace ids.
//!
//! `RequestTrace` mints a [`TraceId`], stores it in request extensions and
//! opens a task-local scope around the request future. Error responses,
//! db error mapping and the JSON extractor read it back through
//! [`trace_id`] so the id in a Problem Details body always matches the
//! `x-request-id` header of the same response.

use std::cell::RefCell;
use std::fmt;

use tokio::task_local;
use uuid::Uuid;

const OUTSIDE_REQUEST: &str = "unknown";

/// Request-scoped identifier, stored in actix request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(String);

impl TraceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TraceId> for String {
    fn from(id: TraceId) -> Self {
        id.0
    }
}

task_local! {
    static TRACE_ID: RefCell<Option<TraceId>>;
}

/// Trace id of the request being served, or "unknown" outside one.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().as_ref().map(|id| id.to_string()))
        .ok()
        .flatten()
        .unwrap_or_else(|| OUTSIDE_REQUEST.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: TraceId, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
