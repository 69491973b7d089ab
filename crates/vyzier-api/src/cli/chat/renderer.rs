//! Terminal markdown rendering for assistant replies.
//!
//! Replies arrive whole (no streaming), so each one is rendered once through
//! `termimad`.

use std::time::Duration;

use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use vyzier_types::message::{Message, MessageRole};

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render markdown to a string of terminal escapes.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one message with its speaker label.
    pub fn print_message(&self, message: &Message) {
        match message.role {
            MessageRole::User => {
                println!("  {} {}", style("You >").green().bold(), message.content);
            }
            MessageRole::Assistant => {
                println!("  {}", style("Vyzier").cyan().bold());
                for line in self.render(&message.content).lines() {
                    println!("  {line}");
                }
            }
        }
        println!();
    }

    /// Print the footer after a reply.
    pub fn print_reply_footer(&self, elapsed: Duration, resolver: &str) {
        println!(
            "  {} {:.1}s {} {}",
            style("|").dim(),
            style(elapsed.as_secs_f64()).dim(),
            style("\u{00b7}").dim(),
            style(resolver).dim(),
        );
        println!();
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_text() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("1. **Goal:** pick one metric");
        assert!(out.contains("Goal"));
        assert!(out.contains("pick one metric"));
    }

    #[test]
    fn test_render_empty() {
        assert!(ChatRenderer::new().render("").trim().is_empty());
    }
}
