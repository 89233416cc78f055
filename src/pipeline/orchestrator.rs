use anyhow::Result;
use log::debug;
use std::io::Write;
use std::thread::JoinHandle;

use crate::Opts;
use crate::engine::output::ResultSink;
use crate::pipeline;

/// Result of [`hash_tree`]: the flushed writer and the number of lines printed.
pub type HashTreeResult<W> = (W, usize);

/// Join workers and then the drain. Every handle is joined even if an earlier one panicked.
pub fn shutdown_pipeline_handles<W: Write>(
    worker_handles: Vec<JoinHandle<usize>>,
    drain_handle: JoinHandle<pipeline::DrainOutcome<W>>,
) -> Result<pipeline::DrainOutcome<W>> {
    let mut panicked = false;
    let mut hashed = 0_usize;
    for h in worker_handles {
        match h.join() {
            Ok(n) => hashed += n,
            Err(_) => panicked = true,
        }
    }
    debug!("Workers done: {} files hashed", hashed);
    let outcome = drain_handle
        .join()
        .map_err(|_| anyhow::anyhow!("result drain thread panicked"))?;
    if panicked {
        anyhow::bail!("hasher worker thread panicked");
    }
    Ok(outcome)
}

/// Main orchestrator: hash every file under `opts.roots` and print one line per file to `out`.
/// Walk (this thread) → task channel → workers → result channel → drain → `out`.
///
/// Line order across workers is not discovery order; with one worker it is.
/// On a fatal error the channels are still closed and every thread joined before the first
/// error is returned. Lines already written stay written.
pub fn hash_tree<W>(opts: &Opts, out: W) -> Result<HashTreeResult<W>>
where
    W: Write + Send + 'static,
{
    let tuning = pipeline::setup_pipeline_tuning(opts);
    let channels = pipeline::create_pipeline_channels(tuning.channel_cap);
    let abort = pipeline::AbortSignal::new();

    let worker_handles = pipeline::spawn_hasher_workers(
        channels.task_rx,
        &channels.result_tx,
        opts.algorithm,
        &abort,
        tuning.num_threads,
    );

    // Dropping the last sender closes the channel so the drain exits.
    drop(channels.result_tx);

    let drain_handle = pipeline::spawn_result_drain(
        channels.result_rx,
        ResultSink::new(opts.format, out),
        &abort,
    );

    let tasks = pipeline::discover_tasks(&opts.roots, opts.follow_links);
    if let Err(err) = pipeline::run_walk_loop(channels.task_tx, tasks, &abort) {
        abort.raise(err);
    }

    let outcome = shutdown_pipeline_handles(worker_handles, drain_handle)?;
    abort.check()?;

    debug!("Printed {} lines", outcome.printed);
    let out = outcome.sink.into_inner()?;
    Ok((out, outcome.printed))
}
