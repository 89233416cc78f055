//! CLI command handler: resolve configuration, set up logging, run the pipeline on stdout.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use std::time::Instant;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::pipeline::hash_tree;
use crate::utils::config::PackagePaths;
use crate::utils::hashtree_toml::{
    HashtreeToml, apply_file_to_opts, load_default_toml, load_explicit_toml,
};
use crate::utils::setup_logging;

/// Config file for this run plus any error from a malformed default file (reported as a warning).
type LoadedConfig = (Option<HashtreeToml>, Option<anyhow::Error>);

/// `--config FILE` must load; the default file in `cwd` is optional.
fn load_config_file(cli: &Cli, cwd: &Path) -> Result<LoadedConfig> {
    if let Some(path) = &cli.config {
        return Ok((Some(load_explicit_toml(path)?), None));
    }
    Ok(match load_default_toml(cwd) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    })
}

/// Build [`Opts`]: defaults, then `file`, then flags. Unknown hash or format names fail here,
/// before any thread starts.
pub fn resolve_opts(cli: &Cli, file: Option<&HashtreeToml>) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts)?;
    }
    if let Some(name) = &cli.hash {
        opts.algorithm = name.parse()?;
    }
    if let Some(name) = &cli.fmt {
        opts.format = name.parse()?;
    }
    if cli.jobs.is_some() {
        opts.num_threads = cli.jobs;
    }
    opts.follow_links |= cli.follow_links;
    opts.verbose |= cli.verbose;
    opts.roots = cli.roots.clone();
    Ok(opts)
}

/// Hash every root and print results to stdout.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let cwd = std::env::current_dir().context("current directory")?;
    let (file, malformed) = load_config_file(cli, &cwd)?;

    setup_logging(cli.verbose || file.as_ref().and_then(|f| f.verbose()).unwrap_or(false));
    if let Some(err) = malformed {
        warn!("Ignoring config file: {:#}", err);
    }

    let opts = resolve_opts(cli, file.as_ref())?;
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let (_, printed) = hash_tree(&opts, std::io::stdout())?;
    debug!("Hashed {} files in {:?}", printed, start_time.elapsed());
    Ok(())
}
