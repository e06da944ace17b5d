// Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// procrules - one-shot process rule engine
///
/// Applies a declarative rule file to the running process table: each rule
/// selects processes by name and either changes their scheduling priority or
/// terminates them. Rules are applied once, in file order, and the tool exits.
#[derive(Parser, Debug)]
#[command(name = "procrules")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Apply priority and termination rules to running processes", long_about = None)]
pub struct Args {
    /// Rule file to apply (default: ./rules.toml)
    #[arg(short = 'r', long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Dry run mode - don't touch the process table, just report what would happen
    #[arg(long = "dryrun")]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Use syslog instead of stdout/stderr for logging
    #[arg(long = "syslog")]
    pub syslog: bool,
}

impl Args {
    /// Parse arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
