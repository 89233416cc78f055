//! Hashing pipeline: walk, worker pool, drain, and the orchestrator that wires them.

pub mod context;
pub mod drain;
pub mod error_handler;
pub mod hasher;
pub mod orchestrator;
pub mod walk;

pub use context::{
    PipelineChannels, PipelineTuning, create_pipeline_channels, setup_pipeline_tuning,
};
pub use drain::{DrainOutcome, drain_results, spawn_result_drain};
pub use error_handler::AbortSignal;
pub use hasher::spawn_hasher_workers;
pub use orchestrator::{HashTreeResult, hash_tree, shutdown_pipeline_handles};
pub use walk::{WalkOutcome, discover_tasks, run_walk_loop, to_outcome_walkdir};
