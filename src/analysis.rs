//! The map/reduce contract shared by every analysis.
//! Implement `Analysis` for a new aggregation and hand it to `SocialPipeline::run`.

use crate::chunk::Chunk;
use crate::error::PipelineError;
use serde::Serialize;

pub trait Analysis: Sync {
    /// Ungrouped per-chunk output; owned by the map stage until reduce takes it.
    type Partial: Send;
    /// One aggregate row of the final artifact.
    type Row: Serialize;

    /// Short label used in logs and progress bars.
    fn name(&self) -> &'static str;

    /// Pure per-chunk transformation. Must not touch shared mutable state.
    fn map(&self, chunk: &Chunk<'_>) -> Result<Self::Partial, PipelineError>;

    /// Group and aggregate all partials. The result must not depend on how the input
    /// was chunked or in which order partials arrive.
    fn reduce(&self, partials: Vec<Self::Partial>) -> Vec<Self::Row>;
}
