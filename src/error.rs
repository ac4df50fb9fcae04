//! Typed failures surfaced by the chunk/map/reduce core.
//! I/O plumbing around it (sources, sinks, the binary) stays on `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad chunk count, empty record set, or a row that failed validation on load.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One chunk's map function failed; the whole run is aborted.
    #[error("map failed in chunk {chunk} (record {}): {reason}", .record_id.as_deref().unwrap_or("<unknown>"))]
    MapFailure {
        chunk: usize,
        record_id: Option<String>,
        reason: String,
    },

    /// The worker pool could not be sized or built.
    #[error("worker pool unavailable: {0}")]
    PoolUnavailable(String),
}

impl PipelineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn map_failure(chunk: usize, record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MapFailure { chunk, record_id: Some(record_id.into()), reason: reason.into() }
    }

    /// Identifier of the offending record, when the failure carries one.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::MapFailure { record_id, .. } => record_id.as_deref(),
            _ => None,
        }
    }
}
