//! Welcome banner display for chat sessions.

use console::style;

use vyzier_types::chat::SUGGESTED_PROMPTS;

/// Print the banner at the start of a chat session.
///
/// `resolver` names the reply strategy and `source` says where replies come
/// from (an endpoint URL or the built-in rules).
pub fn print_welcome_banner(resolver: &str, source: &str, stored_messages: usize) {
    println!();
    println!("  ✨ {}", style("Vyzier").cyan().bold());
    println!("  {}", style("Your AI marketing specialist").dim());
    println!();
    println!("  {}  {} {}", style("Replies:").bold(), resolver, style(source).dim());
    println!(
        "  {}  {}",
        style("History:").bold(),
        style(format!("{stored_messages} messages")).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

/// Print the starter prompts offered on a fresh conversation.
pub fn print_suggestions() {
    println!("  {}", style("Try asking:").bold());
    for prompt in SUGGESTED_PROMPTS {
        println!("  {} {}", style("›").cyan(), prompt);
    }
    println!();
}
