//! File descriptor limit detection (Unix).

/// Descriptors held by one hashing worker: the file being read.
pub const FDS_PER_WORKER: usize = 1;

/// Descriptors kept back for the walk (open directory handles), stdio and the logger.
const FDS_RESERVED: usize = 32;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Most workers the FD limit can carry at once, or `None` when there is no limit.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()? as usize;
    Some((limit.saturating_sub(FDS_RESERVED) / FDS_PER_WORKER).max(1))
}

/// Warn when `num_threads` workers could run out of descriptors. The worker count is left as is.
pub fn warn_if_over_fd_limit(num_threads: usize) {
    if let Some(cap) = max_workers_by_fd_limit()
        && num_threads > cap
    {
        log::warn!(
            "{} workers may exceed the open file limit (room for ~{}); raise `ulimit -n` if opens fail",
            num_threads,
            cap
        );
    }
}
