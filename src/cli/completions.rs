use std::io::Write;

use clap::CommandFactory;
use clap_complete::generate;

use super::commands::{Cli, Shell};

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(clap_complete::Shell::from(shell), &mut cmd, bin_name, out);
}
