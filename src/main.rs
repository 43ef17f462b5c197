use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;

use claude_chat_core::{config, ChatSession, ClaudeClient, Config};

#[derive(Parser)]
#[command(name = "claude-chat")]
#[command(version, about = "Chat with Claude from the terminal")]
struct Cli {
    /// Model identifier to use
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tokens in each reply
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Base URL of the Anthropic API
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (defaults to <config dir>/claude-chat/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout belongs to the conversation
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api_key = config::api_key_from_env()?;

    let file_config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = file_config
        .merge(Config {
            model: cli.model,
            max_tokens: cli.max_tokens,
            base_url: cli.base_url,
        })
        .into_settings();

    let client = ClaudeClient::new(&api_key).with_base_url(&settings.base_url);
    let mut session = ChatSession::new(client, settings);
    tracing::info!(
        model = %session.settings().model,
        max_tokens = session.settings().max_tokens,
        "starting chat"
    );

    println!("{}", "=== Claude Chat ===".bold());
    println!("Type your message and press Enter (type 'exit' to quit)\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout).await?;

    Ok(())
}
