//! Shell completion scripts.

use std::io::Write as _;

use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to `writer`.
pub fn write_completions(shell: Shell, writer: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();
    clap_complete::generate(shell, &mut cmd, bin_name, writer);
}

pub fn generate_completions(shell: Shell) {
    let mut stdout = std::io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush().ok();
}
