use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plan camera survey flights from JSON mission requests.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Camera intrinsics JSON file. Takes precedence over any camera
    /// given in the request.
    #[arg(short, long, global = true)]
    pub camera: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Plan a single mission.
    Plan {
        /// Mission request file.
        request: PathBuf,

        #[command(subcommand)]
        format: Format,
    },

    /// Plan several missions in parallel, printing one JSON document
    /// per request in the order given.
    Batch {
        /// Mission request files.
        #[arg(required = true)]
        requests: Vec<PathBuf>,
    },
}

#[derive(Debug, Subcommand, Clone, Copy)]
pub enum Format {
    /// Print waypoints to stdout.
    Csv,

    /// Print waypoints and a summary to stdout.
    Json,

    /// Plot the flight path to terminal.
    Plot,
}
