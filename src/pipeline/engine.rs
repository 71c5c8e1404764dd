//! Generation pipeline - worker pool, bounded hand-off queue, single sink
//! consumer, cancellation and progress accounting

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, WordforgeError};
use crate::mutate::{estimate_total, PatternCombiner, VariationGenerator};
use crate::pipeline::chunk::partition;
use crate::pipeline::sink::OutputSink;
use crate::pipeline::stream::CandidateStream;
use crate::types::{
    ExecutionMode, GenerationOptions, PipelineConfig, RunReport, RunStatus, WorkerFailure,
};
use crate::validation_error;

/// Cross-task state. The emitted counter and the cancellation flag are the
/// only mutables shared with producers; everything else is bookkeeping read
/// by the caller.
struct Shared {
    emitted: AtomicU64,
    cancelled: AtomicBool,
    estimated: AtomicU64,
    status: Mutex<RunStatus>,
    failures: Mutex<Vec<WorkerFailure>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            estimated: AtomicU64::new(0),
            status: Mutex::new(RunStatus::Idle),
            failures: Mutex::new(Vec::new()),
        }
    }

    fn status(&self) -> RunStatus {
        *self.status.lock()
    }

    fn set_status(&self, status: RunStatus) {
        *self.status.lock() = status;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn record_failure(&self, worker: usize, error: String) {
        warn!(worker, error = %error, "worker failed; run continues with partial coverage");
        self.failures.lock().push(WorkerFailure {
            worker,
            error,
            failed_at: Utc::now(),
        });
    }
}

/// Orchestrates candidate generation: partitions tokens, drives producers
/// and the single sink consumer, and exposes progress to the caller.
///
/// One run at a time. `start` spawns the run (it must be called inside a
/// tokio runtime), the caller polls `emitted_count`/`estimated_total`/
/// `is_running`, may `cancel` at any point, and collects the final
/// [`RunReport`] with `wait`.
pub struct GenerationPipeline {
    config: PipelineConfig,
    shared: Arc<Shared>,
    run: Mutex<Option<JoinHandle<Result<RunReport>>>>,
}

impl GenerationPipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared::new()),
            run: Mutex::new(None),
        }
    }

    /// Start a generation run.
    ///
    /// Tokens are trimmed and empty entries dropped; an empty remainder is a
    /// validation error, the pipeline never silently starts on no input.
    /// Fails if a run is already active.
    pub fn start(
        &self,
        tokens: Vec<String>,
        options: GenerationOptions,
        mode: ExecutionMode,
        sink: OutputSink,
    ) -> Result<()> {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(validation_error!("no tokens to generate from"));
        }

        let mut run = self.run.lock();
        if self.shared.status().is_active() {
            return Err(validation_error!("a generation run is already active"));
        }

        let estimated = estimate_total(&tokens, &options);
        self.shared.emitted.store(0, Ordering::SeqCst);
        self.shared.cancelled.store(false, Ordering::SeqCst);
        self.shared.estimated.store(estimated, Ordering::SeqCst);
        self.shared.failures.lock().clear();
        self.shared.set_status(RunStatus::Running);

        debug!(
            tokens = tokens.len(),
            estimated,
            mode = ?mode,
            "starting generation run"
        );

        let handle = tokio::spawn(run_pipeline(
            Arc::clone(&self.shared),
            self.config.clone(),
            tokens,
            options,
            mode,
            sink,
        ));
        *run = Some(handle);
        Ok(())
    }

    /// Request cancellation. Idempotent; effective immediately for future
    /// enqueue attempts. Already-queued candidates are still written.
    pub fn cancel(&self) {
        if !self.shared.cancelled.swap(true, Ordering::SeqCst) && self.is_running() {
            info!("cancellation requested");
        }
    }

    /// Candidates durably written so far
    pub fn emitted_count(&self) -> u64 {
        self.shared.emitted.load(Ordering::SeqCst)
    }

    /// Upper-bound estimate computed at start; progress denominator only
    pub fn estimated_total(&self) -> u64 {
        self.shared.estimated.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.shared.status().is_active()
    }

    pub fn status(&self) -> RunStatus {
        self.shared.status()
    }

    /// Wait for the current run to finish and collect its report.
    ///
    /// A sink failure surfaces here as the run's error; worker failures do
    /// not fail the run and are listed in the report instead.
    pub async fn wait(&self) -> Result<RunReport> {
        let handle = self.run.lock().take();
        match handle {
            Some(handle) => handle.await?,
            None => Err(validation_error!("no generation run to wait for")),
        }
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_pipeline(
    shared: Arc<Shared>,
    config: PipelineConfig,
    tokens: Vec<String>,
    options: GenerationOptions,
    mode: ExecutionMode,
    sink: OutputSink,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let (tx, rx) = mpsc::channel::<String>(config.queue_capacity.max(1));

    let mut sink_task = tokio::spawn(drain_queue(rx, sink, Arc::clone(&shared)));

    let producers = match mode {
        ExecutionMode::Parallel { workers } => {
            spawn_workers(&shared, workers, &tokens, &options, tx)
        }
        ExecutionMode::Sequential => vec![spawn_sequential(&shared, tokens, &options, tx)],
    };

    // Producers are always joined; a panicking worker is recorded and its
    // siblings keep going.
    for (worker, joined) in join_all(producers).await.into_iter().enumerate() {
        if let Err(e) = joined {
            shared.record_failure(worker, format!("worker task aborted: {e}"));
        }
    }

    shared.set_status(RunStatus::Draining);
    debug!("producers finished; sink draining remaining queue");

    // The sink join is bounded. On expiry the sink is abandoned and queued
    // candidates are lost; that outcome is reported, never masked.
    let mut sink_abandoned = false;
    let mut sink_error: Option<WordforgeError> = None;
    match tokio::time::timeout(config.drain_timeout, &mut sink_task).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => sink_error = Some(e),
        Ok(Err(join_err)) => sink_error = Some(join_err.into()),
        Err(_) => {
            warn!(
                timeout_ms = config.drain_timeout.as_millis() as u64,
                "sink did not drain within the timeout; abandoning it"
            );
            sink_task.abort();
            sink_abandoned = true;
        }
    }

    let status = if sink_error.is_some() {
        RunStatus::Failed
    } else if shared.is_cancelled() {
        RunStatus::Cancelled
    } else {
        RunStatus::Completed
    };
    shared.set_status(status);

    let report = RunReport {
        status,
        emitted: shared.emitted.load(Ordering::SeqCst),
        estimated_total: shared.estimated.load(Ordering::SeqCst),
        failures: shared.failures.lock().clone(),
        sink_abandoned,
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        status = %report.status,
        emitted = report.emitted,
        failures = report.failures.len(),
        "generation run finished"
    );

    match sink_error {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

/// Fixed-size worker pool over the chunk list. Each worker mutates every
/// token in its chunk and combines the chunk's tokens; combinations across
/// distant chunks are intentionally not produced in this model (the
/// sequential model covers the full token list).
fn spawn_workers(
    shared: &Arc<Shared>,
    workers: usize,
    tokens: &[String],
    options: &GenerationOptions,
    tx: mpsc::Sender<String>,
) -> Vec<JoinHandle<()>> {
    let chunks: VecDeque<Vec<String>> = partition(tokens).into();
    debug!(workers = workers.max(1), chunks = chunks.len(), "spawning worker pool");
    let work = Arc::new(Mutex::new(chunks));

    (0..workers.max(1))
        .map(|_| {
            let shared = Arc::clone(shared);
            let work = Arc::clone(&work);
            let tx = tx.clone();
            let generator = VariationGenerator::new(options);
            let combiner = PatternCombiner::new(options);
            tokio::spawn(async move {
                loop {
                    if shared.is_cancelled() {
                        break;
                    }
                    let chunk = work.lock().pop_front();
                    let Some(chunk) = chunk else { break };
                    if !emit_chunk(&shared, &generator, &combiner, &chunk, &tx).await {
                        break;
                    }
                }
            })
        })
        .collect()
}

/// Push one chunk's candidates. Returns false when the run is over for this
/// worker (cancellation observed or the sink hung up).
async fn emit_chunk(
    shared: &Shared,
    generator: &VariationGenerator,
    combiner: &PatternCombiner,
    chunk: &[String],
    tx: &mpsc::Sender<String>,
) -> bool {
    for token in chunk {
        for candidate in generator.generate(token) {
            if shared.is_cancelled() {
                return false;
            }
            // A full queue blocks here: backpressure, not loss
            if tx.send(candidate).await.is_err() {
                return false;
            }
        }
    }
    for candidate in combiner.combine(chunk) {
        if shared.is_cancelled() {
            return false;
        }
        if tx.send(candidate).await.is_err() {
            return false;
        }
    }
    true
}

/// The cooperative single-producer model: one task pulls the deduplicated
/// stream, checking cancellation once per step.
fn spawn_sequential(
    shared: &Arc<Shared>,
    tokens: Vec<String>,
    options: &GenerationOptions,
    tx: mpsc::Sender<String>,
) -> JoinHandle<()> {
    let shared = Arc::clone(shared);
    let stream = CandidateStream::new(tokens, options);
    tokio::spawn(async move {
        for candidate in stream {
            if shared.is_cancelled() {
                break;
            }
            if tx.send(candidate).await.is_err() {
                break;
            }
        }
    })
}

/// The single sink consumer: pop, write one line, flush, count. Runs until
/// every producer handle is gone and the queue is empty. A write failure is
/// fatal to the run: producers are told to stop and the error surfaces to
/// the caller.
async fn drain_queue(
    mut rx: mpsc::Receiver<String>,
    mut sink: OutputSink,
    shared: Arc<Shared>,
) -> Result<()> {
    while let Some(candidate) = rx.recv().await {
        if let Err(e) = sink.write_candidate(&candidate) {
            warn!(error = %e, "sink write failed; aborting run");
            shared.cancelled.store(true, Ordering::SeqCst);
            return Err(e);
        }
        shared.emitted.fetch_add(1, Ordering::SeqCst);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn read_lines(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_rejects_empty_token_list() {
        let pipeline = GenerationPipeline::new();
        let sink = OutputSink::from_writer(Vec::new());
        let err = pipeline
            .start(
                tokens(&["  ", ""]),
                GenerationOptions::default(),
                ExecutionMode::Sequential,
                sink,
            )
            .unwrap_err();
        assert!(matches!(err, WordforgeError::Validation { .. }));
        assert!(!pipeline.is_running());
    }

    #[tokio::test]
    async fn test_parallel_run_writes_all_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let pipeline = GenerationPipeline::new();

        pipeline
            .start(
                tokens(&["admin", "2024"]),
                GenerationOptions::default(),
                ExecutionMode::Parallel { workers: 4 },
                OutputSink::create(&path).unwrap(),
            )
            .unwrap();
        let report = pipeline.wait().await.unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert!(!pipeline.is_running());
        assert!(report.failures.is_empty());
        assert!(!report.sink_abandoned);

        let lines = read_lines(&path);
        assert_eq!(lines.len() as u64, report.emitted);
        assert_eq!(pipeline.emitted_count(), report.emitted);
        assert!(report.estimated_total >= 1);
        for expected in ["admin", "ADMIN", "Admin", "4dmin", "admin@2024", "2024admin"] {
            assert!(
                lines.iter().any(|l| l == expected),
                "missing candidate {expected}"
            );
        }
    }

    #[tokio::test]
    async fn test_rejects_second_start_while_active() {
        let pipeline = GenerationPipeline::new();
        pipeline
            .start(
                tokens(&["admin"]),
                GenerationOptions::default(),
                ExecutionMode::Sequential,
                OutputSink::from_writer(Vec::new()),
            )
            .unwrap();

        let err = pipeline
            .start(
                tokens(&["other"]),
                GenerationOptions::default(),
                ExecutionMode::Sequential,
                OutputSink::from_writer(Vec::new()),
            )
            .unwrap_err();
        assert!(matches!(err, WordforgeError::Validation { .. }));

        pipeline.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_before_tasks_run_emits_nothing() {
        // Current-thread runtime: spawned tasks have not run yet when cancel
        // lands, so every producer observes the flag on its first check.
        let pipeline = GenerationPipeline::new();
        pipeline
            .start(
                tokens(&["admin", "root", "backup", "2024", "staging"]),
                GenerationOptions::default(),
                ExecutionMode::Parallel { workers: 4 },
                OutputSink::from_writer(Vec::new()),
            )
            .unwrap();
        pipeline.cancel();
        pipeline.cancel(); // idempotent

        let report = pipeline.wait().await.unwrap();
        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.emitted, 0);
        assert_eq!(pipeline.status(), RunStatus::Cancelled);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sink_write_failure_is_fatal() {
        let pipeline = GenerationPipeline::new();
        pipeline
            .start(
                tokens(&["admin"]),
                GenerationOptions::default(),
                ExecutionMode::Sequential,
                OutputSink::from_writer(FailingWriter),
            )
            .unwrap();

        let err = pipeline.wait().await.unwrap_err();
        assert!(matches!(err, WordforgeError::Io { .. }));
        assert_eq!(pipeline.status(), RunStatus::Failed);
        assert!(!pipeline.is_running());
    }

    #[test]
    fn test_sequential_run_with_block_on() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("out.txt");
            let pipeline = GenerationPipeline::new();
            pipeline
                .start(
                    tokens(&["admin", "2024"]),
                    GenerationOptions::default(),
                    ExecutionMode::Sequential,
                    OutputSink::create(&path).unwrap(),
                )
                .unwrap();
            let report = pipeline.wait().await.unwrap();
            assert_eq!(report.status, RunStatus::Completed);

            // Sequential model: globally unique output
            let lines = read_lines(&path);
            let unique: std::collections::HashSet<&String> = lines.iter().collect();
            assert_eq!(unique.len(), lines.len());
            assert_eq!(lines.len() as u64, report.emitted);
        });
    }

    #[tokio::test]
    async fn test_pipeline_reusable_after_completion() {
        let pipeline = GenerationPipeline::new();
        for _ in 0..2 {
            pipeline
                .start(
                    tokens(&["admin"]),
                    GenerationOptions::default(),
                    ExecutionMode::Sequential,
                    OutputSink::from_writer(Vec::new()),
                )
                .unwrap();
            let report = pipeline.wait().await.unwrap();
            assert_eq!(report.status, RunStatus::Completed);
        }
    }
}
