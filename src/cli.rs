//! CLI argument parsing for taskdoc.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "td",
    about = "Plain-text tasks with YAML headers, metadata search and backlinks",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/taskdoc/logs/taskdoc.log"
)]
pub struct Cli {
    /// Task directory (default: current directory)
    #[arg(short = 'd', long, visible_alias = "path", global = true)]
    pub dir: Option<PathBuf>,

    /// Editor program for interactive flows (falls back to $VISUAL, then vi)
    #[arg(long, env = "EDITOR", global = true)]
    pub editor: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new task
    Create {
        /// Task title
        title: String,

        /// Attribute to set, as KEY=VALUE (repeatable)
        #[arg(short = 'a', long = "attribute", value_name = "ATTR")]
        attributes: Vec<String>,

        /// Attributes to set, as a JSON object
        #[arg(long, value_name = "JSON")]
        json_attr: Option<String>,

        /// Edit the new task in the editor before saving
        #[arg(short, long)]
        interactive: bool,
    },

    /// Find tasks whose metadata contains the query (opens the editor if no query flags are given)
    Search {
        /// Query entry, as KEY=VALUE (repeatable)
        #[arg(short = 'a', long = "attribute", value_name = "ATTR")]
        attributes: Vec<String>,

        /// Query as a JSON object
        #[arg(long, value_name = "JSON")]
        json_query: Option<String>,
    },

    /// Record this task as a backlink on every task it links to
    Backlinks {
        /// Task path relative to the task directory (".md" optional)
        task: String,
    },

    /// Print a stored task document
    Show {
        /// Task path relative to the task directory (".md" optional)
        task: String,
    },
}
