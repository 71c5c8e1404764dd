//! Core types and structures for wordforge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Character-substitution breadth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// At most one whole-word variant per substitutable character class
    #[default]
    Sampled,
    /// Per-position Cartesian product over each character's glyph pool.
    /// Grows exponentially with token length; callers bound token length
    /// or accept the cost.
    Full,
}

impl std::fmt::Display for SubstitutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubstitutionMode::Sampled => write!(f, "sampled"),
            SubstitutionMode::Full => write!(f, "full"),
        }
    }
}

/// Combination aggressiveness, ordinal 1..=3.
///
/// Out-of-range values clamp; unparseable text falls back to the default
/// level 2 rather than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Depth(u8);

impl Depth {
    pub const LIGHT: Depth = Depth(1);
    pub const MEDIUM: Depth = Depth(2);
    pub const HEAVY: Depth = Depth(3);

    /// Create a depth, clamping to the supported 1..=3 range
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 3))
    }

    /// Parse user text; invalid or non-numeric input yields the default
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<u8>()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for one generation run, immutable once the run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Significant year to weave into candidates (e.g. "2024")
    pub year: Option<String>,
    pub depth: Depth,
    /// Apply case patterns (lower, UPPER, Title, First)
    pub use_case: bool,
    /// Apply character substitution (a→4, e→3, ...)
    pub use_leet: bool,
    pub mode: SubstitutionMode,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            year: None,
            depth: Depth::default(),
            use_case: true,
            use_leet: true,
            mode: SubstitutionMode::Sampled,
        }
    }
}

impl GenerationOptions {
    /// Year trimmed to a usable value; empty input counts as absent
    pub fn effective_year(&self) -> Option<&str> {
        self.year
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
    }
}

/// How candidates are produced.
///
/// The two models trade differently (both are supported on purpose, and the
/// caller picks rather than the pipeline silently choosing):
/// - `Parallel` runs a fixed-size worker pool over token chunks. Two chunks
///   may independently produce the same candidate and both get written; output
///   line order is unspecified.
/// - `Sequential` runs one cooperative task against a shared seen-set,
///   guaranteeing global uniqueness and a deterministic generation order, with
///   no parallel speed-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Parallel { workers: usize },
    Sequential,
}

/// Pipeline lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    /// All producers finished; the sink is still flushing the queue
    Draining,
    Completed,
    Cancelled,
    /// The run aborted on a sink failure
    Failed,
}

impl RunStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::Draining)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Cancelled | RunStatus::Failed
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "idle"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Draining => write!(f, "draining"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An isolated worker failure; the run continues with partial coverage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerFailure {
    pub worker: usize,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    /// Candidates durably written by the sink
    pub emitted: u64,
    /// Upper-bound estimate computed at start; progress denominator only
    pub estimated_total: u64,
    /// Worker failures observed during the run (partial coverage, not hidden)
    pub failures: Vec<WorkerFailure>,
    /// True when the sink missed the drain timeout and was abandoned,
    /// dropping buffered-but-unwritten candidates
    pub sink_abandoned: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Tuning knobs for the generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum unconsumed candidates in the hand-off queue; a full queue
    /// blocks producers (backpressure)
    pub queue_capacity: usize,
    /// How long to wait for the sink to flush the queue after all workers
    /// finish before abandoning it
    pub drain_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
            drain_timeout: Duration::from_secs(5),
        }
    }
}
