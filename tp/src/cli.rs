//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Answer, QuestionKind};

/// TripPacker - packing lists from your own templates plus model suggestions
#[derive(Parser)]
#[command(name = "tp", author, version, about = "Trip packing-list assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a packing list for a new trip
    Generate {
        /// Free-text trip description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Answer clarification questions before building
        #[arg(short, long)]
        ask: bool,
    },

    /// Edit a trip's list with a free-text request
    Refine {
        /// Trip id or unique prefix
        trip: String,

        /// What to change, e.g. "remove the drone, add a rain jacket"
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },

    /// Flip an item's packed state (positions as shown by `show`)
    Toggle {
        /// Trip id or unique prefix
        trip: String,

        /// Category position, 1-based
        category: usize,

        /// Item position within the category, 1-based
        item: usize,
    },

    /// List past trips, most recent first
    List,

    /// Show a trip's checklist
    Show {
        /// Trip id or unique prefix; defaults to the most recent trip
        trip: Option<String>,
    },

    /// List the built-in templates
    Templates,

    /// Delete every trip
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Convert a 1-based position from the command line
pub fn zero_based(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

/// Interpret a yes/no answer typed at a prompt
///
/// Accepts English and Hebrew forms; anything else, including an empty line,
/// means the question is skipped.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "כ" | "כן" => Some(true),
        "n" | "no" | "ל" | "לא" => Some(false),
        _ => None,
    }
}

/// Interpret a typed answer to a clarification question
///
/// Yes/no questions go through [`parse_yes_no`]; text questions take the
/// trimmed line. `None` means the question was skipped.
pub fn parse_answer(kind: QuestionKind, input: &str) -> Option<Answer> {
    match kind {
        QuestionKind::YesNo => parse_yes_no(input).map(Answer::YesNo),
        QuestionKind::Text => {
            let text = input.trim();
            (!text.is_empty()).then(|| Answer::Text(text.to_string()))
        }
    }
}
