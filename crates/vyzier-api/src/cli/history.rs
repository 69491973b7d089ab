//! Show the stored conversation.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use vyzier_types::message::MessageRole;

use super::{format_relative_time, preview};
use crate::state::AppState;

/// Print the last `limit` stored messages as a table, or as JSON.
pub async fn show_history(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let conversation = state.message_store().load().await;
    let messages = conversation.recent(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in messages {
        let from = match message.role {
            MessageRole::User => Cell::new("You").fg(Color::Green),
            MessageRole::Assistant => Cell::new("Vyzier").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(format_relative_time(&message.created_at)).fg(Color::DarkGrey),
            from,
            Cell::new(preview(&message.content, 80)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    if messages.len() < conversation.len() {
        println!(
            "  Showing {} of {} messages ({} for more)",
            style(messages.len()).bold(),
            conversation.len(),
            style("--limit").yellow()
        );
    } else {
        println!(
            "  {} message{}",
            style(messages.len()).bold(),
            if messages.len() == 1 { "" } else { "s" }
        );
    }
    println!();

    Ok(())
}
