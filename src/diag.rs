use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

// 1. DiagnosticSink Contract
/// DiagnosticSink
///
/// Defines the abstract contract for the best-effort diagnostic log. This trait allows
/// us to swap the concrete implementation—from the real file sink (FileDiagnosticSink)
/// in production to the in-memory Mock (MockDiagnosticSink) during testing—without
/// affecting the calling handlers.
///
/// The sink is fire-and-forget: appends never fail from the caller's point of view.
/// Persistence failure detail is routed here so it stays out of HTTP responses.
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    /// Appends one formatted line. `detail` carries optional structured context
    /// (e.g., the underlying database error) serialized as JSON.
    async fn append(&self, message: &str, detail: Option<serde_json::Value>);
}

/// DiagState
///
/// The concrete type used to share the diagnostic sink across the application state.
pub type DiagState = Arc<dyn DiagnosticSink>;

// 2. The Real Implementation (Append-Only File)
/// FileDiagnosticSink
///
/// Appends `"[ISO-timestamp] <message> <optional JSON>\n"` lines to a fixed-path log
/// file. The file handle is acquired and released per write rather than held as
/// process-wide mutable state, so the sink carries no state across requests.
pub struct FileDiagnosticSink {
    path: PathBuf,
}

impl FileDiagnosticSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await
    }
}

#[async_trait]
impl DiagnosticSink for FileDiagnosticSink {
    /// append
    ///
    /// Best-effort: a failed write is reported to standard error and swallowed,
    /// never propagated to the request path.
    async fn append(&self, message: &str, detail: Option<serde_json::Value>) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = match detail {
            Some(detail) => format!("[{}] {} {}\n", timestamp, message, detail),
            None => format!("[{}] {}\n", timestamp, message),
        };

        if let Err(e) = self.write_line(&line).await {
            eprintln!("diagnostic log write failed: {}", e);
        }
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockDiagnosticSink
///
/// Records every appended entry in memory so tests can assert that a handler logged
/// failure detail (and exactly how much of it) without touching the filesystem.
#[derive(Default)]
pub struct MockDiagnosticSink {
    entries: Mutex<Vec<(String, Option<serde_json::Value>)>>,
}

impl MockDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiagnosticSink for MockDiagnosticSink {
    async fn append(&self, message: &str, detail: Option<serde_json::Value>) {
        self.entries
            .lock()
            .unwrap()
            .push((message.to_string(), detail));
    }
}
