//! Conversation statistics command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;

use super::format_relative_time;
use crate::state::AppState;

/// Display message counts and activity for the stored conversation.
pub async fn stats(state: &AppState, json: bool) -> Result<()> {
    let store = state.message_store();
    let conversation = store.load().await;

    let user = conversation.messages().iter().filter(|m| m.is_user()).count();
    let assistant = conversation.len() - user;
    let recorded = store.message_count().await;
    let last_active = conversation.last().map(|m| m.created_at);
    let last_saved = state
        .persistence
        .updated_at(&state.config.history_key)
        .await?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    if json {
        let stats = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "resolver": state.config.resolver.to_string(),
            "messages": {
                "total": conversation.len(),
                "user": user,
                "assistant": assistant,
                "recorded_count": recorded,
            },
            "last_active": last_active.map(|dt| dt.to_rfc3339()),
            "last_saved": last_saved.map(|dt| dt.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  {} Vyzier v{}", style("✨").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Messages ──").dim());
    println!("  Total:     {}", style(conversation.len()).bold());
    println!("  From you:  {}", style(user).green());
    println!("  Replies:   {}", style(assistant).cyan());
    if let Some(recorded) = recorded {
        if recorded != conversation.len() as u64 {
            println!("  Recorded:  {}", style(recorded).yellow());
        }
    }
    println!();

    println!("  {}", style("── Activity ──").dim());
    println!(
        "  Last message: {}",
        last_active.as_ref().map_or("never".to_string(), format_relative_time)
    );
    println!(
        "  Last saved:   {}",
        last_saved.as_ref().map_or("never".to_string(), format_relative_time)
    );
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Replies:  {}", style(state.config.resolver).dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
