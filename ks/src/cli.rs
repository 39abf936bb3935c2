//! CLI argument parsing for kvstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ks")]
#[command(author, version, about = "Inspect and recover named store slots", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides config)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all slots
    List,

    /// Print a slot's raw contents
    Get {
        /// Slot name
        #[arg(required = true)]
        slot: String,
    },

    /// Replace a slot's contents from a file (or stdin)
    Set {
        /// Slot name
        #[arg(required = true)]
        slot: String,

        /// File to read; stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Copy one slot into another (e.g. restore a corrupt-* backup)
    Copy {
        /// Source slot
        #[arg(required = true)]
        from: String,

        /// Destination slot
        #[arg(required = true)]
        to: String,
    },
}
