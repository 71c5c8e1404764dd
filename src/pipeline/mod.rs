//! Concurrent generation pipeline - worker partitioning, bounded hand-off
//! queue, single sink consumer

mod chunk;
mod engine;
mod sink;
mod stream;

pub use chunk::partition;
pub use engine::GenerationPipeline;
pub use sink::OutputSink;
pub use stream::CandidateStream;
