//! Delete the stored conversation.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use crate::state::AppState;

/// Remove the stored conversation after confirmation.
///
/// `--force` and `--json` skip the prompt.
pub async fn clear_conversation(state: &AppState, force: bool, json: bool) -> Result<()> {
    let store = state.message_store();

    if !force && !json {
        let stored = store.load().await.len();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete the stored conversation ({} messages)?",
                style(stored).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    store.clear().await;

    if json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        println!("  {} Conversation cleared.", style("✓").green().bold());
    }

    Ok(())
}
