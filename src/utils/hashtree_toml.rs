//! Load `.hashtree.toml` (CLI only). Library callers build [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct HashtreeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    hash: Option<String>,
    fmt: Option<String>,
    jobs: Option<usize>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
}

impl HashtreeToml {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config")
    }

    /// `verbose` from the file, if set. Read before logging is configured.
    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Load the config named by `--config`. Missing or malformed is an error.
pub fn load_explicit_toml(path: &Path) -> Result<HashtreeToml> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    HashtreeToml::parse(&s).with_context(|| format!("config {}", path.display()))
}

/// Load `.hashtree.toml` from `dir` if present. Missing or unreadable → None.
/// A malformed file comes back as `Some(Err(..))` so the caller can warn once logging is up.
pub fn load_default_toml(dir: &Path) -> Option<Result<HashtreeToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    Some(HashtreeToml::parse(&s).with_context(|| format!("config {}", path.display())))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// Unknown hash or format names are configuration errors.
pub fn apply_file_to_opts(file: &HashtreeToml, opts: &mut Opts) -> Result<()> {
    let s = &file.settings;
    if let Some(ref name) = s.hash {
        opts.algorithm = name.parse()?;
    }
    if let Some(ref name) = s.fmt {
        opts.format = name.parse()?;
    }
    if let Some(jobs) = s.jobs {
        opts.num_threads = Some(jobs);
    }
    apply_file_opt!(s, opts, follow_links => follow_links);
    apply_file_opt!(s, opts, verbose => verbose);
    Ok(())
}
