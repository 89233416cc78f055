//! Engine: digesters, output sinks, CLI parsing and path helpers.

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod output;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::{Cli, normalize_single_dash_flags};
pub use cli::{handle_run, resolve_opts};
pub use hashing::{Digester, HashAlgorithm, hash_file, hash_reader};
pub use output::{OutputFormat, ResultSink};
pub use tools::{path_relative_to, path_to_slash_string, task_rel_path};
