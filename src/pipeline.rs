use crate::analysis::Analysis;
use crate::chunk::{chunk_records, Chunk};
use crate::config::PipelineOptions;
use crate::emotion::{EmotionAnalysis, EmotionTotal};
use crate::engagement::{EngagementAnalysis, Summary, UserEngagement};
use crate::error::PipelineError;
use crate::lexicon::{LexiconMethod, SentimentScorer};
use crate::pool::{default_worker_count, WorkerPool};
use crate::progress::make_chunk_progress;
use crate::record::Record;
use crate::sentiment::{DailySentiment, SentimentAnalysis};
use crate::sink::{discard_staged, promote_staged, stage_csv, write_csv, TableRow};
use crate::source::load_path_cfg;
use crate::util::init_tracing_once;
use crate::word_count::{WordCount, WordCountAnalysis};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub const WORD_COUNT_FILE: &str = "mapreduce_word_count.csv";
pub const DAILY_SENTIMENT_FILE: &str = "mapreduce_daily_sentiment.csv";
pub const USER_STATS_FILE: &str = "mapreduce_user_stats.csv";
pub const EMOTION_TOTALS_FILE: &str = "emotion_totals.csv";

#[derive(Clone, Debug, Default)]
pub struct SocialPipeline {
    pub(crate) opts: PipelineOptions,
}

/// What `run_all` produced.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub word_counts: PathBuf,
    pub daily_sentiment: PathBuf,
    pub user_stats: PathBuf,
    pub summary: Summary,
}

impl SocialPipeline {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    pub fn from_options(opts: PipelineOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn workers(mut self, n: usize) -> Self { self.opts = self.opts.with_workers(n); self }
    pub fn reserve(mut self, n: usize) -> Self { self.opts = self.opts.with_reserve(n); self }
    pub fn chunks(mut self, k: usize) -> Self { self.opts = self.opts.with_chunks(k); self }
    pub fn lexicon(mut self, method: LexiconMethod) -> Self { self.opts = self.opts.with_lexicon(method); self }
    pub fn scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self { self.opts = self.opts.with_scorer(scorer); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    /// Pool size for this run: the pinned worker count, or hardware − reserve.
    pub fn worker_count(&self) -> Result<usize, PipelineError> {
        match self.opts.workers {
            Some(n) => Ok(n),
            None => default_worker_count(self.opts.reserve),
        }
    }

    /// Load records from a file or directory using the configured read buffer.
    pub fn load(&self, path: &Path) -> Result<Vec<Record>> {
        load_path_cfg(path, self.opts.read_buffer_bytes)
    }

    // -------- Core: chunk → parallel map → join → reduce --------

    /// Worker count and chunk plan. Input problems surface here, before any pool exists.
    fn plan<'r>(&self, records: &'r [Record]) -> Result<(usize, Vec<Chunk<'r>>), PipelineError> {
        let workers = self.worker_count()?;
        let k = self.opts.chunks.unwrap_or(workers);
        Ok((workers, chunk_records(records, k)?))
    }

    /// Run one analysis over `records`.
    ///
    /// Input problems are reported before any worker starts. The pool lives only for
    /// the map stage and is released before reduce, on success and on failure alike.
    pub fn run<A: Analysis>(&self, analysis: &A, records: &[Record]) -> Result<Vec<A::Row>, PipelineError> {
        init_tracing_once();
        let (workers, chunks) = self.plan(records)?;
        let mapped = {
            let pool = WorkerPool::new(workers)?;
            self.map_stage(&pool, analysis, &chunks)
        };
        Ok(self.reduce_stage(analysis, mapped?))
    }

    /// Run one analysis on a pool the caller owns, so several analyses can share it.
    /// Without a pinned chunk count, K follows the pool size.
    pub fn run_with<A: Analysis>(
        &self,
        pool: &WorkerPool,
        analysis: &A,
        records: &[Record],
    ) -> Result<Vec<A::Row>, PipelineError> {
        init_tracing_once();
        let chunks = chunk_records(records, self.opts.chunks.unwrap_or(pool.threads()))?;
        let partials = self.map_stage(pool, analysis, &chunks)?;
        Ok(self.reduce_stage(analysis, partials))
    }

    fn map_stage<A: Analysis>(
        &self,
        pool: &WorkerPool,
        analysis: &A,
        chunks: &[Chunk<'_>],
    ) -> Result<Vec<(usize, A::Partial)>, PipelineError> {
        let records: usize = chunks.iter().map(|c| c.len()).sum();
        tracing::info!(
            analysis = analysis.name(),
            records,
            chunks = chunks.len(),
            workers = pool.threads(),
            "planned map stage"
        );

        let pb = if self.opts.progress {
            let label = self.opts.progress_label.as_deref().unwrap_or(analysis.name());
            Some(make_chunk_progress(chunks.len() as u64, label))
        } else {
            None
        };

        let mapped = pool.map_chunks(chunks, pb.as_ref(), |chunk| {
            tracing::debug!(analysis = analysis.name(), chunk = chunk.index, records = chunk.len(), "map");
            analysis.map(chunk)
        });

        match mapped {
            Ok(p) => {
                if let Some(pb) = &pb { pb.finish_with_message(format!("{}: map done", analysis.name())); }
                Ok(p)
            }
            Err(e) => {
                if let Some(pb) = &pb { pb.abandon_with_message(format!("{}: failed", analysis.name())); }
                tracing::error!(analysis = analysis.name(), error = %e, "map stage aborted");
                Err(e)
            }
        }
    }

    fn reduce_stage<A: Analysis>(&self, analysis: &A, mut partials: Vec<(usize, A::Partial)>) -> Vec<A::Row> {
        let started = Instant::now();
        // Reduce is order-independent; sorting only makes the input to it reproducible.
        partials.sort_unstable_by_key(|(idx, _)| *idx);
        let rows = analysis.reduce(partials.into_iter().map(|(_, p)| p).collect());
        tracing::info!(
            analysis = analysis.name(),
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reduce done"
        );
        rows
    }

    /// Run one analysis and persist its table. Nothing is written if the run fails.
    pub fn run_to_csv<A>(&self, analysis: &A, records: &[Record], out: &Path) -> Result<Vec<A::Row>>
    where
        A: Analysis,
        A::Row: TableRow,
    {
        let rows = self.run(analysis, records)?;
        write_csv(out, &rows, self.opts.write_buffer_bytes)?;
        Ok(rows)
    }

    // -------- The three standard analyses (plus emotions) --------

    pub fn word_counts(&self, records: &[Record]) -> Result<Vec<WordCount>, PipelineError> {
        self.run(&WordCountAnalysis, records)
    }

    pub fn daily_sentiment(&self, records: &[Record]) -> Result<Vec<DailySentiment>, PipelineError> {
        self.run(&SentimentAnalysis::new(self.opts.scorer.clone()), records)
    }

    pub fn user_engagement(&self, records: &[Record]) -> Result<Vec<UserEngagement>, PipelineError> {
        self.run(&EngagementAnalysis, records)
    }

    pub fn emotion_totals(&self, records: &[Record]) -> Result<Vec<EmotionTotal>, PipelineError> {
        self.run(&EmotionAnalysis::default(), records)
    }

    /// Compute word counts, daily sentiment, and user engagement on one shared pool,
    /// then write all three tables under `out_dir`.
    ///
    /// Every analysis finishes before the first file is staged, and no table is
    /// promoted until all three are staged, so a failure leaves `out_dir` without
    /// new artifacts.
    pub fn run_all(&self, records: &[Record], out_dir: &Path) -> Result<RunReport> {
        init_tracing_once();
        let (workers, chunks) = self.plan(records)?;
        let (words, daily, users) = {
            let pool = WorkerPool::new(workers)?;
            let sentiment = SentimentAnalysis::new(self.opts.scorer.clone());
            let words = self.map_stage(&pool, &WordCountAnalysis, &chunks)?;
            let daily = self.map_stage(&pool, &sentiment, &chunks)?;
            let users = self.map_stage(&pool, &EngagementAnalysis, &chunks)?;
            (
                self.reduce_stage(&WordCountAnalysis, words),
                self.reduce_stage(&sentiment, daily),
                self.reduce_stage(&EngagementAnalysis, users),
            )
        };

        let report = RunReport {
            word_counts: out_dir.join(WORD_COUNT_FILE),
            daily_sentiment: out_dir.join(DAILY_SENTIMENT_FILE),
            user_stats: out_dir.join(USER_STATS_FILE),
            summary: Summary::from_engagement(&users),
        };

        let buf = self.opts.write_buffer_bytes;
        let dests = [&report.word_counts, &report.daily_sentiment, &report.user_stats];
        let mut staged: Vec<PathBuf> = Vec::with_capacity(dests.len());
        let staging = (|| -> Result<()> {
            staged.push(stage_csv(dests[0], &words, buf)?);
            staged.push(stage_csv(dests[1], &daily, buf)?);
            staged.push(stage_csv(dests[2], &users, buf)?);
            Ok(())
        })();
        if let Err(e) = staging {
            discard_staged(&staged);
            return Err(e);
        }
        for (i, (tmp, dest)) in staged.iter().zip(dests).enumerate() {
            if let Err(e) = promote_staged(tmp, dest) {
                discard_staged(&staged[i..]);
                return Err(e);
            }
        }
        Ok(report)
    }
}
