use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "snask", version, about = "Snask native runtime tools")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Serve a JSON route table over HTTP, one connection at a time.
    Serve {
        /// Route table: an object keyed by "METHOD path" or "path".
        routes: PathBuf,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Exit after this many connections (0 serves forever).
        #[arg(long, value_name = "N")]
        max_requests: Option<usize>,
    },
    /// Inspect JSON documents with the runtime codec.
    Json {
        #[command(subcommand)]
        command: JsonCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum JsonCommand {
    /// Re-render a document (2-space indent unless --compact).
    Fmt {
        file: PathBuf,
        #[arg(long)]
        compact: bool,
    },
    /// Report whether a document parses.
    Check { file: PathBuf },
    /// Print the value at a path such as `a.b[0]`.
    Get { file: PathBuf, path: String },
}
