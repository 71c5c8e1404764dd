//! Wordforge - human-pattern password wordlist generation
//!
//! Builds custom wordlists for authorized security audits from a handful of
//! user-supplied tokens (names, keywords, years) by applying deterministic
//! mutations and streaming the results to a single sink with live progress.

pub mod error;
pub mod mutate;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WordforgeError};
pub use mutate::{estimate_total, CasePattern, PatternCombiner, VariationGenerator};
pub use pipeline::{CandidateStream, GenerationPipeline, OutputSink};
pub use types::{
    Depth, ExecutionMode, GenerationOptions, PipelineConfig, RunReport, RunStatus,
    SubstitutionMode, WorkerFailure,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
