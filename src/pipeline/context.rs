//! Pipeline channels and tuning.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::debug;

use crate::utils::config::{CHANNEL_CAP_PER_WORKER, WorkerThreadLimits};
use crate::utils::fd_limit::warn_if_over_fd_limit;
use crate::{HashResult, Opts, Task};

/// Worker count and channel capacity for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_threads: usize,
    /// Capacity of both the task and the result channel.
    pub channel_cap: usize,
}

impl PipelineTuning {
    pub fn for_threads(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        Self {
            num_threads,
            channel_cap: num_threads * CHANNEL_CAP_PER_WORKER,
        }
    }
}

/// Size the pool from `opts.num_threads` (unset or 0 → available threads).
pub fn setup_pipeline_tuning(opts: &Opts) -> PipelineTuning {
    let num_threads = WorkerThreadLimits::current().resolve(opts.num_threads);
    warn_if_over_fd_limit(num_threads);
    let tuning = PipelineTuning::for_threads(num_threads);
    debug!(
        "Workers: {}, channel cap: {}",
        tuning.num_threads, tuning.channel_cap
    );
    tuning
}

/// Bounded channels between the stages. Walk gets task_tx, workers get task_rx and result_tx,
/// the drain gets result_rx.
pub struct PipelineChannels {
    pub task_tx: Sender<Task>,
    pub task_rx: Receiver<Task>,
    pub result_tx: Sender<HashResult>,
    pub result_rx: Receiver<HashResult>,
}

pub fn create_pipeline_channels(channel_cap: usize) -> PipelineChannels {
    let (task_tx, task_rx) = bounded::<Task>(channel_cap);
    let (result_tx, result_rx) = bounded::<HashResult>(channel_cap);
    PipelineChannels {
        task_tx,
        task_rx,
        result_tx,
        result_rx,
    }
}
