use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "driftscan")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Compare Terraform state with what actually runs in the cloud", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read a state document and list its resources
    State(StateArgs),

    /// Build both inventories: declared (state) and observed (cloud)
    Scan(ScanArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// State
// ============================================================================

#[derive(Args)]
pub struct StateArgs {
    /// State location: path, tfstate://path or tfstate+https://host/path
    pub location: String,

    /// Print resources as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Scan
// ============================================================================

#[derive(Args)]
pub struct ScanArgs {
    /// State location to compare against
    #[arg(long, env = "DRIFTSCAN_FROM")]
    pub from: String,

    /// Recorded cloud responses to scan
    #[arg(long)]
    pub replay: PathBuf,

    /// Fetch full details of every scanned resource
    #[arg(long)]
    pub deep: bool,

    /// Number of resource types scanned concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Abort the scan after this many seconds (0 disables the limit)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args() {
        let cli = Cli::parse_from([
            "driftscan",
            "-vv",
            "scan",
            "--from",
            "tfstate://prod.tfstate",
            "--replay",
            "aws.json",
            "--deep",
            "--jobs",
            "8",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.from, "tfstate://prod.tfstate");
                assert_eq!(args.replay, PathBuf::from("aws.json"));
                assert!(args.deep);
                assert_eq!(args.jobs, Some(8));
                assert_eq!(args.timeout, None);
            }
            _ => panic!("expected scan"),
        }
    }
}
