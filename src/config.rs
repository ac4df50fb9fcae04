use crate::lexicon::{LexiconMethod, SentimentScorer};
use crate::source::DEFAULT_READ_BUFFER;
use std::fmt;
use std::sync::Arc;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone)]
pub struct PipelineOptions {
    pub workers: Option<usize>,         // Some(N) pins the pool size; None = hardware − reserve
    pub reserve: usize,                 // cores left free when sizing from hardware
    pub chunks: Option<usize>,          // Some(K) overrides K = worker count
    pub scorer: Arc<dyn SentimentScorer>,
    pub progress: bool,
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: None,
            reserve: 1,
            chunks: None,
            scorer: LexiconMethod::default().scorer(),
            progress: false,
            progress_label: None,
            read_buffer_bytes: DEFAULT_READ_BUFFER,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("workers", &self.workers)
            .field("reserve", &self.reserve)
            .field("chunks", &self.chunks)
            .field("scorer", &self.scorer.name())
            .field("progress", &self.progress)
            .field("progress_label", &self.progress_label)
            .field("read_buffer_bytes", &self.read_buffer_bytes)
            .field("write_buffer_bytes", &self.write_buffer_bytes)
            .finish()
    }
}

impl PipelineOptions {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }
    pub fn with_reserve(mut self, n: usize) -> Self {
        self.reserve = n;
        self
    }
    /// Chunk count is not clamped here: zero is reported as `InvalidInput` at run time.
    pub fn with_chunks(mut self, k: usize) -> Self {
        self.chunks = Some(k);
        self
    }
    pub fn with_lexicon(mut self, method: LexiconMethod) -> Self {
        self.scorer = method.scorer();
        self
    }
    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
