//! Wayfinder - conversational trip-planning assistant
//!
//! CLI entry point: wires config, logging, the LLM client, and the service
//! clients into a turn engine and hands it to the chat loop.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use sessionstore::SessionStore;
use wayfinder::cli::{Cli, Command};
use wayfinder::config::Config;
use wayfinder::llm::create_client;
use wayfinder::pipeline::TurnEngine;
use wayfinder::prompts::PromptLoader;
use wayfinder::repl::ChatSession;
use wayfinder::tools::{HttpPlacesService, HttpRouteService, ToolAdapter};

/// Initialize tracing to a file under the user data directory
///
/// The REPL owns stdout, so logs go to a file; RUST_LOG still applies on top
/// of the chosen level.
fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfinder")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            other => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("wayfinder.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Build the turn engine from config
fn build_engine(config: &Config) -> Result<TurnEngine> {
    let llm = create_client(&config.llm)?;
    let route = HttpRouteService::from_config(&config.services.route)?;
    let places = HttpPlacesService::from_config(&config.services.places)?;
    let adapter = ToolAdapter::new(Arc::new(route), Arc::new(places));
    let prompts = PromptLoader::new(config.prompts.dir.as_ref());

    Ok(TurnEngine::new(llm, adapter, prompts, config.agent.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref())?;

    let config = Config::load(cli.config.as_ref())?;
    config.validate()?;

    let engine = build_engine(&config)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let mut chat = ChatSession::new(engine);
            chat.run().await?;
        }
        Command::Ask { message } => {
            let mut session = SessionStore::new();
            let reply = engine.run_turn(&mut session, &message).await;
            println!("{}", reply);
        }
    }

    Ok(())
}
