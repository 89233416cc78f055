//! hashtree CLI: hash every file under the given paths.

use anyhow::Result;
use hashtree::engine::arg_parser::Cli;
use hashtree::engine::handle_run;

fn main() -> Result<()> {
    let cli = Cli::parse_normalized();
    handle_run(&cli)
}
