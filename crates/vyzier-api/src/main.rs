//! Vyzier command-line chat client.
//!
//! Binary name: `vyzier`
//!
//! Parses CLI arguments, opens the data directory, then dispatches to the
//! interactive chat loop or one of the conversation maintenance commands.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags when set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::log_filter(cli.verbose, cli.quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "vyzier", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat { local, remote } => {
            cli::chat::loop_runner::run_chat_loop(&state, local, remote).await?;
        }

        Commands::History { limit } => {
            cli::history::show_history(&state, limit, cli.json).await?;
        }

        Commands::Stats => {
            cli::stats::stats(&state, cli.json).await?;
        }

        Commands::Clear { force } => {
            cli::clear::clear_conversation(&state, force, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
