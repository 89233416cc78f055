use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Hash every file under one or more directory trees.
#[derive(Clone, Debug, Parser)]
#[command(name = "hashtree", version)]
#[command(
    about = "Hash every regular file under the given paths and print one line per file.",
    long_about = "Hash every regular file under the given paths and print one line per file.\n\n\
        Files are hashed in parallel, so line order is not walk order unless --jobs 1.\n\
        Single-dash long flags (-hash sha1, -fmt=json, -jobs 4) are accepted."
)]
pub struct Cli {
    /// Directories (or files) to hash, walked in the order given.
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Hash function: crc32, md5, sha1, sha224, sha256, sha512. Default: sha256.
    #[arg(long, value_name = "NAME")]
    pub hash: Option<String>,

    /// Output format: hex, base64, json (= json-hex), json-hex, json-base64. Default: hex.
    #[arg(long, value_name = "NAME")]
    pub fmt: Option<String>,

    /// Number of hashing workers. Default (or 0): one per CPU.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Follow symbolic links to directories while walking.
    #[arg(long, short = 'f')]
    pub follow_links: bool,

    /// Verbose (debug) logging on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Config file. Default: `.hashtree.toml` in the current directory, if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse `std::env::args_os()`, accepting single-dash long flags.
    pub fn parse_normalized() -> Self {
        Cli::parse_from(normalize_single_dash_flags(std::env::args_os()))
    }
}

/// Long flag names the CLI knows, including clap's built-ins.
fn long_flag_names() -> Vec<String> {
    Cli::command()
        .get_arguments()
        .filter_map(|a| a.get_long().map(str::to_string))
        .chain(["help".to_string(), "version".to_string()])
        .collect()
}

/// True for `-name` or `-name=value` where `name` is a known long flag.
fn is_single_dash_long(arg: &str, longs: &[String]) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    longs.iter().any(|l| l == name)
}

/// Rewrite `-hash x` style flags to `--hash x`. The first item (program name) and everything
/// after `--` are left alone, as are unknown names and short flags.
pub fn normalize_single_dash_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let longs = long_flag_names();
    let mut after_separator = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || after_separator {
                return arg;
            }
            if arg == "--" {
                after_separator = true;
                return arg;
            }
            let rewritten = arg
                .to_str()
                .filter(|s| is_single_dash_long(s, &longs))
                .map(|s| OsString::from(format!("-{s}")));
            rewritten.unwrap_or(arg)
        })
        .collect()
}
