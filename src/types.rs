//! Public and internal types for the hashtree API and pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::hashing::HashAlgorithm;
use crate::engine::output::OutputFormat;

/// One file to hash: where it lives on disk, plus its display path relative to its root.
#[derive(Clone, Debug)]
pub struct Task {
    /// Root the walk started from, shared by every task of that root.
    pub root: Arc<PathBuf>,
    /// Path as the walk found it, opened as is. Never rebuilt from `rel_path`.
    pub path: PathBuf,
    /// Forward-slash path relative to `root` (`.` when the root is itself a file).
    /// Lossy for names that are not UTF-8; output only.
    pub rel_path: String,
}

/// A finished digest, ready for the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashResult {
    pub path: String,
    pub digest: Vec<u8>,
}

/// Run configuration. Built once (defaults, then config file, then CLI) and passed by reference.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Roots to walk, in the order given.
    pub roots: Vec<PathBuf>,
    /// Digest algorithm (default sha256).
    pub algorithm: HashAlgorithm,
    /// Output line layout (default hex).
    pub format: OutputFormat,
    /// Worker count. `None` or `Some(0)` means one per available CPU.
    pub num_threads: Option<usize>,
    /// Follow symlinked directories during the walk.
    pub follow_links: bool,
    /// Debug logging.
    pub verbose: bool,
}
