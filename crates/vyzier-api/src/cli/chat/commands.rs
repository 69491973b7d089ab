//! Slash command parsing for the chat loop.
//!
//! Anything starting with `/` is a command and is never sent as a message.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen (the conversation is kept).
    Clear,
    /// Print the conversation so far.
    History,
    /// Delete the stored conversation and start over.
    Reset,
    /// Show the suggested starter prompts.
    Suggest,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/history" => Some(ChatCommand::History),
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/suggest" | "/ideas" => Some(ChatCommand::Suggest),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, about) in [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/history", "Show the conversation so far"),
        ("/reset", "Delete the conversation and start over"),
        ("/suggest", "Show starter prompts"),
        ("/exit", "End the chat session"),
    ] {
        println!("  {:<10} {}", style(name).cyan(), about);
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+D to exit. Your conversation is saved after every message.").dim()
    );
    println!();
}
