//! Result drain: the single consumer that prints results in arrival order.

use crossbeam_channel::Receiver;
use std::io::Write;
use std::thread::{self, JoinHandle};

use crate::HashResult;
use crate::engine::output::ResultSink;

use super::error_handler::AbortSignal;

/// What the drain hands back when it exits: the sink (for flushing) and lines printed.
pub struct DrainOutcome<W: Write> {
    pub sink: ResultSink<W>,
    pub printed: usize,
}

/// Print every result from `result_rx`, one at a time, until the channel is closed and empty.
/// A write failure raises the abort signal and stops the drain; dropping `result_rx` then makes
/// the workers' sends fail.
pub fn drain_results<W: Write>(
    result_rx: Receiver<HashResult>,
    mut sink: ResultSink<W>,
    abort: &AbortSignal,
) -> DrainOutcome<W> {
    let mut printed = 0_usize;
    for result in result_rx.iter() {
        if let Err(err) = sink.print(&result) {
            abort.raise(err);
            break;
        }
        printed += 1;
    }
    drop(result_rx);
    DrainOutcome { sink, printed }
}

pub fn spawn_result_drain<W>(
    result_rx: Receiver<HashResult>,
    sink: ResultSink<W>,
    abort: &AbortSignal,
) -> JoinHandle<DrainOutcome<W>>
where
    W: Write + Send + 'static,
{
    let abort = abort.clone();
    thread::spawn(move || drain_results(result_rx, sink, &abort))
}
