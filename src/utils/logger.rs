//! stderr logging for the CLI. stdout carries result lines only.

use colored::{ColoredString, Colorize};
use env_logger::fmt::Formatter;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, Record};
use std::io::Write;

use crate::utils::config::PackagePaths;

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error".red().bold(),
        Level::Warn => "warning".yellow().bold(),
        Level::Info => "info".green(),
        Level::Debug => "debug".blue(),
        Level::Trace => "trace".dimmed(),
    }
}

/// `hashtree warning: msg`; debug and trace records also name their module.
fn format_record(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let prefix = PackagePaths::get().pkg_name().cyan();
    let label = level_label(record.level());
    match record.level() {
        Level::Debug | Level::Trace => writeln!(
            buf,
            "{prefix} {label} [{}]: {}",
            record.target(),
            record.args()
        ),
        _ => writeln!(buf, "{prefix} {label}: {}", record.args()),
    }
}

/// Install the logger. This crate logs at info (debug when `verbose`); dependencies at warn.
/// `RUST_LOG` is read first. A second call is a no-op.
pub fn setup_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), crate_level)
        .target(Target::Stderr)
        .format(format_record)
        .try_init();
}
