//! Worker pool: each worker pulls tasks, hashes the file, pushes the result.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::thread::{self, JoinHandle};

use crate::engine::hashing::{HashAlgorithm, hash_file};
use crate::utils::config::HashingConsts;
use crate::{HashResult, Task};

use super::error_handler::AbortSignal;

/// Single hashing worker. Exits when the task channel is closed and empty, when the drain is
/// gone, or when the abort signal is raised. An open/read failure raises the signal.
fn hasher_worker_loop(
    task_rx: Receiver<Task>,
    result_tx: Sender<HashResult>,
    algorithm: HashAlgorithm,
    abort: AbortSignal,
) -> usize {
    let mut buf = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    let mut hashed = 0_usize;
    while let Ok(task) = task_rx.recv() {
        if abort.is_raised() {
            break;
        }
        match hash_file(&task.path, algorithm, &mut buf) {
            Ok(digest) => {
                let result = HashResult {
                    path: task.rel_path,
                    digest,
                };
                if result_tx.send(result).is_err() {
                    break;
                }
                hashed += 1;
            }
            Err(err) => {
                abort.raise(err);
                break;
            }
        }
    }
    drop(result_tx);
    hashed
}

/// Spawn `num_threads` workers. Takes `task_rx` by value so the only receivers left are the
/// workers' own; when they all exit, the walk's sends fail instead of blocking.
/// Caller must drop its `result_tx` after this so the drain sees the channel close.
pub fn spawn_hasher_workers(
    task_rx: Receiver<Task>,
    result_tx: &Sender<HashResult>,
    algorithm: HashAlgorithm,
    abort: &AbortSignal,
    num_threads: usize,
) -> Vec<JoinHandle<usize>> {
    debug!("Spawning {} {} workers", num_threads, algorithm);
    (0..num_threads)
        .map(|_| {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let abort = abort.clone();
            thread::spawn(move || hasher_worker_loop(task_rx, result_tx, algorithm, abort))
        })
        .collect()
}
