//! Fatal error propagation across pipeline threads.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared abort state: the first fatal error plus a flag every stage polls.
/// Cloning shares the same state.
#[derive(Clone, Default)]
pub struct AbortSignal {
    raised: Arc<AtomicBool>,
    first_error: Arc<Mutex<Option<anyhow::Error>>>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<anyhow::Error>> {
        self.first_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `err` (kept only if nothing was recorded before) and tell every stage to stop.
    pub fn raise(&self, err: anyhow::Error) {
        {
            let mut slot = self.slot();
            if slot.is_none() {
                *slot = Some(err);
            } else {
                log::debug!("additional error after abort: {:#}", err);
            }
        }
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Take the first recorded error. Call after every stage has been joined.
    pub fn check(&self) -> Result<()> {
        match self.slot().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
