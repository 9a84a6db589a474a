use crate::storage::{BackendLocal, StorageManager};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const REQUEST_LOG_FILE: &str = "requests.jsonl";

/// One answered request. Write-only: nothing in ytt reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: String,
    pub at: String,
    pub endpoint: String,
    pub input: String,
    pub output: Value,
}

impl RequestLogEntry {
    pub fn new(endpoint: &str, input: &str, output: Value) -> Self {
        Self {
            id: rusty_ulid::generate_ulid_string(),
            at: chrono::Utc::now().to_rfc3339(),
            endpoint: endpoint.to_string(),
            input: input.to_string(),
            output,
        }
    }
}

pub trait RequestLog: Send + Sync {
    fn record(&self, entry: &RequestLogEntry) -> std::io::Result<()>;
}

/// Appends entries as json lines to `requests.jsonl` in the base directory.
pub struct JsonlRequestLog {
    store: BackendLocal,
}

impl JsonlRequestLog {
    pub fn new(base_path: &str) -> std::io::Result<Self> {
        Ok(Self {
            store: BackendLocal::new(base_path)?,
        })
    }
}

impl RequestLog for JsonlRequestLog {
    fn record(&self, entry: &RequestLogEntry) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        self.store.append(REQUEST_LOG_FILE, &line)
    }
}

/// Fire and forget. A failed write is logged and otherwise ignored.
pub fn record_in_background(sink: Option<Arc<dyn RequestLog>>, entry: RequestLogEntry) {
    let Some(sink) = sink else {
        return;
    };

    tokio::task::spawn_blocking(move || {
        if let Err(err) = sink.record(&entry) {
            log::warn!("failed to write request log entry {}: {err}", entry.id);
        }
    });
}
