//! CLI command definitions for the `vyzier` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod clear;
pub mod history;
pub mod stats;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with Vyzier, your AI marketing specialist.
#[derive(Parser)]
#[command(name = "vyzier", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors (command output is unaffected).
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Answer with the built-in keyword rules (takes precedence over --remote).
        #[arg(long)]
        local: bool,

        /// Send messages to this chat endpoint.
        #[arg(long, value_name = "URL", env = "VYZIER_ENDPOINT")]
        remote: Option<String>,
    },

    /// Show the stored conversation.
    #[command(alias = "log")]
    History {
        /// Number of most recent messages to show.
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
    },

    /// Show conversation statistics.
    Stats,

    /// Delete the stored conversation.
    #[command(alias = "reset")]
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Tracing filter for the verbosity flags. `-v` beats `--quiet`.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,vyzier_core=debug,vyzier_infra=debug",
        _ => "trace",
    }
}

/// Shorten `text` to at most `max` characters on one line.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Human-friendly age of a timestamp ("just now", "5m ago", "3d ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let diff = Utc::now() - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
