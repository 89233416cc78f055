//! hashtree: hash every regular file under one or more directory trees in parallel.
//!
//! One thread walks the roots and queues a [`Task`] per file, a fixed pool of workers hashes
//! them, and a single drain prints each [`HashResult`] as one line. Both queues are bounded,
//! so a slow disk or a slow reader on stdout throttles the walk.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::hashing::HashAlgorithm;
pub use engine::output::OutputFormat;

pub use anyhow::Error;

/// Result alias used by public hashtree API
pub type Result<T> = std::result::Result<T, Error>;

/// Hash every file under `opts.roots` and write one line per file to `out`.
/// Returns the writer (flushed) and the number of lines written.
///
/// Lines come out in completion order; with `num_threads: Some(1)` that is walk order.
///
/// ```no_run
/// let opts = hashtree::Opts {
///     roots: vec!["src".into()],
///     num_threads: Some(1),
///     ..Default::default()
/// };
/// let (out, n) = hashtree::hash_dirs(&opts, Vec::new())?;
/// println!("{n} files, {} bytes of output", out.len());
/// # Ok::<(), hashtree::Error>(())
/// ```
pub fn hash_dirs<W>(opts: &Opts, out: W) -> Result<(W, usize)>
where
    W: std::io::Write + Send + 'static,
{
    pipeline::hash_tree(opts, out)
}
