//! CLI argument definitions using clap
//!
//! Commands:
//! - mandi-api serve [--config <path>] [--host <host>] [--port <port>] [--data <path>]
//! - mandi-api stats [COMMODITY] [--data <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mandi Price API - read-only queries over agricultural market prices
#[derive(Parser, Debug)]
#[command(name = "mandi-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log per-request events as well as lifecycle events
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the dataset and serve the HTTP API
    Serve(ServeArgs),

    /// Print price statistics for the dataset and exit
    Stats {
        /// Only records of this commodity (case-insensitive)
        commodity: Option<String>,

        /// Dataset file
        #[arg(long, env = "MANDI_DATA")]
        data: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Dataset file
    #[arg(long, env = "MANDI_DATA")]
    pub data: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["mandi-api", "serve", "--port", "8080", "--data", "/tmp/m.json"])
            .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.data, Some(PathBuf::from("/tmp/m.json")));
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_stats() {
        let cli = Cli::try_parse_from(["mandi-api", "-v", "stats", "Rice"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Stats { commodity: Some(ref c), .. } if c == "Rice"
        ));
    }
}
