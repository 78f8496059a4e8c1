use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "ATC transcript interpreter and conflict advisor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract the fields of one or more transcripts
    Interpret {
        #[arg(required = true)]
        transcripts: Vec<String>,
        /// Assemble callsigns without stripping facility/greeting prefixes
        #[arg(long)]
        baseline: bool,
    },
    /// Run both callsign modes over a file of transcripts, one per line
    Compare { file: PathBuf },
    /// Read transcripts from stdin and track the traffic they describe
    Session {
        /// Synthesize kinematics for new aircraft and keep them moving
        #[arg(long)]
        simulate: bool,
        #[arg(long)]
        baseline: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_interpret_args() {
        let cli = Cli::parse_from(["atc-copilot", "interpret", "ROGER", "--baseline"]);
        match cli.command {
            Commands::Interpret {
                transcripts,
                baseline,
            } => {
                assert_eq!(transcripts, ["ROGER"]);
                assert!(baseline);
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }
}
