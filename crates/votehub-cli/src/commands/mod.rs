//! CLI command definitions and dispatch.

pub mod catalog;
pub mod demo;
pub mod submit;
pub mod tally;
pub mod vote;
pub mod watch;
pub mod withdraw;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use votehub_core::config::AppConfig;
use votehub_core::error::AppError;
use votehub_core::traits::store::SyncStore;
use votehub_entity::Catalog;
use votehub_realtime::VotingSession;
use votehub_security::DefaultGuard;
use votehub_store::StoreManager;

/// VoteHub: live collaborative naming vote
#[derive(Debug, Parser)]
#[command(name = "votehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List categories and their seed items
    Catalog(catalog::CatalogArgs),
    /// Show current results
    Tally(tally::TallyArgs),
    /// Toggle a vote
    Vote(vote::VoteArgs),
    /// Submit a new item
    Submit(submit::SubmitArgs),
    /// Withdraw one of your submissions
    Withdraw(withdraw::WithdrawArgs),
    /// Join the vote and print live activity until Ctrl-C
    Watch(watch::WatchArgs),
    /// Run a two-voter scenario against an in-memory store
    Demo(demo::DemoArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Catalog(args) => catalog::execute(args, self.format).await,
            Commands::Tally(args) => tally::execute(args, &self.config, self.format).await,
            Commands::Vote(args) => vote::execute(args, &self.config, self.format).await,
            Commands::Submit(args) => submit::execute(args, &self.config, self.format).await,
            Commands::Withdraw(args) => withdraw::execute(args, &self.config).await,
            Commands::Watch(args) => watch::execute(args, &self.config).await,
            Commands::Demo(args) => demo::execute(args, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}

/// Helper: connect to the configured store
pub fn connect(config: &AppConfig) -> Result<Arc<dyn SyncStore>, AppError> {
    tracing::debug!(backend = %config.store.backend, "Connecting to store");
    Ok(Arc::new(StoreManager::new(&config.store)?))
}

/// Helper: open a session for `voter` against `store`
pub async fn open_session(
    store: Arc<dyn SyncStore>,
    config: &AppConfig,
    voter: &str,
) -> Result<VotingSession, AppError> {
    VotingSession::open(
        store,
        Arc::new(DefaultGuard::new(config)),
        Arc::new(Catalog::seeded()),
        config,
        voter,
    )
    .await
}
