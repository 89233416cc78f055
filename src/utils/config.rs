//! Application configuration constants.
//! Tuning and buffer sizes in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the current directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

/// Worker count limits.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Never run fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0,
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count for a requested `jobs` value: `None` or `0` means all available threads.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) if n > 0 => n,
            _ => self.all_threads.max(self.floor),
        }
    }
}

// ---- Hashing ----

/// Hashing buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Read chunk per worker (bytes). 1 MB, reused across that worker's files.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Channel cap ----

/// Task and result channel capacity, per worker. Keeps in-flight work proportional to the pool.
pub const CHANNEL_CAP_PER_WORKER: usize = 2;
