//! Main chat loop orchestration.
//!
//! Restores the stored conversation, prints the banner, then reads lines
//! until the user exits. Each line is either a slash command or a message
//! handed to the session controller.

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use vyzier_core::chat::controller::SendOutcome;
use vyzier_core::resolver::provider::ResponseResolver;
use vyzier_types::chat::SessionState;
use vyzier_types::config::{ChatConfig, ResolverMode};
use vyzier_types::event::SessionEvent;

use crate::state::{AppState, ConcreteSessionController};

use super::banner::{print_suggestions, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Messages replayed from a restored conversation before the prompt.
const REPLAY_LIMIT: usize = 6;

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    local: bool,
    remote: Option<String>,
) -> anyhow::Result<()> {
    let config = state.chat_config(local, remote);
    let controller = state.start_session(&config).await?;
    let renderer = ChatRenderer::new();

    let conversation = controller.conversation();
    print_welcome_banner(
        ResponseResolver::name(controller.resolver()),
        &reply_source(&config),
        conversation.len(),
    );

    let replay = conversation.recent(REPLAY_LIMIT);
    if replay.len() < conversation.len() {
        println!(
            "  {}",
            style(format!(
                "... {} earlier messages (/history to show all)",
                conversation.len() - replay.len()
            ))
            .dim()
        );
        println!();
    }
    for message in replay {
        renderer.print_message(message);
    }
    if conversation.len() == 1 {
        print_suggestions();
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::History => {
                    println!();
                    for message in controller.conversation().messages() {
                        renderer.print_message(message);
                    }
                }
                ChatCommand::Reset => match controller.clear().await {
                    Some(fresh) => {
                        println!("\n  {} Conversation reset.\n", style("✓").green().bold());
                        for message in fresh.messages() {
                            renderer.print_message(message);
                        }
                        print_suggestions();
                    }
                    None => println!(
                        "\n  {} Can't reset while a reply is pending.\n",
                        style("!").yellow().bold()
                    ),
                },
                ChatCommand::Suggest => {
                    println!();
                    print_suggestions();
                }
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let started = Instant::now();
        let outcome = send_with_spinner(&controller, &text).await;

        match outcome {
            SendOutcome::Replied(reply) => {
                println!();
                renderer.print_message(&reply);
                renderer.print_reply_footer(started.elapsed(), ResponseResolver::name(controller.resolver()));
            }
            SendOutcome::Fallback(reply) => {
                println!();
                renderer.print_message(&reply);
                if config.resolver == ResolverMode::Remote {
                    println!(
                        "  {}",
                        style("Could not reach the chat service. Run with -v for details.").dim()
                    );
                    println!();
                }
            }
            SendOutcome::Busy => println!(
                "\n  {} Still waiting for the previous reply.\n",
                style("!").yellow().bold()
            ),
            SendOutcome::Rejected(_) => {}
        }
    }

    Ok(())
}

/// Send `text`, showing a typing spinner while the reply is pending.
async fn send_with_spinner(controller: &ConcreteSessionController, text: &str) -> SendOutcome {
    let mut events = controller.subscribe();
    let spinner = typing_spinner();

    let send = controller.send(text);
    tokio::pin!(send);

    let outcome = loop {
        tokio::select! {
            outcome = &mut send => break outcome,
            Ok(event) = events.recv() => match event {
                SessionEvent::PendingStarted { .. } => {
                    spinner.enable_steady_tick(Duration::from_millis(80));
                }
                SessionEvent::StateChanged { to: SessionState::Error, .. } => {
                    spinner.set_message("something went wrong...");
                }
                other => debug!(?other, "Session event"),
            },
        }
    };

    spinner.finish_and_clear();
    outcome
}

fn typing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Vyzier is typing...");
    spinner
}

fn reply_source(config: &ChatConfig) -> String {
    match (config.resolver, config.endpoint.as_deref()) {
        (ResolverMode::Remote, Some(endpoint)) => format!("({endpoint})"),
        _ => "(built-in rules)".to_string(),
    }
}
