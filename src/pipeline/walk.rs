//! Task source: walks each root depth-first and yields one task per file.

use anyhow::Result;
use crossbeam_channel::Sender;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::Task;
use crate::engine::tools::task_rel_path;

use super::error_handler::AbortSignal;

/// One result from a directory walk: a task to send, an entry to pass over, or a fatal error.
pub enum WalkOutcome {
    Task(Task),
    Skip,
    Err(anyhow::Error),
}

/// True when a symlink entry should become a task: its target is a regular file, or it
/// dangles (the open then fails and stops the run). Links to directories or special files
/// are passed over.
fn symlink_targets_file(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(_) => true,
    }
}

/// Convert a walkdir result into [`WalkOutcome`]. Only regular files, and symlinks resolving
/// to one, become tasks.
pub fn to_outcome_walkdir(
    r: Result<walkdir::DirEntry, walkdir::Error>,
    root: &Arc<PathBuf>,
) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let ft = entry.file_type();
            let is_task = ft.is_file() || (ft.is_symlink() && symlink_targets_file(entry.path()));
            if !is_task {
                return WalkOutcome::Skip;
            }
            let rel_path = task_rel_path(entry.path(), root);
            WalkOutcome::Task(Task {
                root: Arc::clone(root),
                path: entry.into_path(),
                rel_path,
            })
        }
        Err(err) => {
            let msg = match err.path() {
                Some(p) => format!("walk {}", p.display()),
                None => format!("walk {}", root.display()),
            };
            WalkOutcome::Err(anyhow::Error::new(err).context(msg))
        }
    }
}

fn walkdir_iter(root: Arc<PathBuf>, follow_links: bool) -> impl Iterator<Item = WalkOutcome> {
    WalkDir::new(root.as_path())
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .map(move |r| to_outcome_walkdir(r, &root))
}

/// Tasks for every root, in the order given. Within a root: depth-first, parent before
/// children, siblings by file name. Overlapping roots yield their shared files once per root.
pub fn discover_tasks(
    roots: &[PathBuf],
    follow_links: bool,
) -> impl Iterator<Item = Result<Task>> + use<> {
    roots
        .to_vec()
        .into_iter()
        .flat_map(move |root| {
            debug!("Walking {}", root.display());
            walkdir_iter(Arc::new(root), follow_links)
        })
        .filter_map(|outcome| match outcome {
            WalkOutcome::Task(task) => Some(Ok(task)),
            WalkOutcome::Skip => None,
            WalkOutcome::Err(err) => Some(Err(err)),
        })
}

/// Push every task from `iter` into `task_tx`, blocking while the channel is full.
/// Stops early when the abort signal is raised or all workers are gone. A walk error stops the
/// loop and is returned. Drops `task_tx` on return, which closes the channel. Returns the count sent.
pub fn run_walk_loop<I>(task_tx: Sender<Task>, iter: I, abort: &AbortSignal) -> Result<usize>
where
    I: Iterator<Item = Result<Task>>,
{
    let mut count = 0_usize;
    for item in iter {
        if abort.is_raised() {
            break;
        }
        let task = item?;
        if task_tx.send(task).is_err() {
            break;
        }
        count += 1;
    }
    drop(task_tx);
    debug!("Walk done: {} files queued", count);
    Ok(count)
}
