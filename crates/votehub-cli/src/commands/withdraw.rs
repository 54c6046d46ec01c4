//! Submission withdrawal.

use clap::Args;

use crate::output;
use votehub_core::error::AppError;

/// Arguments for the withdraw command
#[derive(Debug, Args)]
pub struct WithdrawArgs {
    /// Voter name; must match the original submitter
    #[arg(short, long)]
    pub voter: String,

    /// Category ID
    pub category: String,

    /// Submission ID
    pub id: String,
}

/// Execute the withdraw command
pub async fn execute(args: &WithdrawArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::connect(&config)?;
    let session = super::open_session(store, &config, &args.voter).await?;

    let result = session.withdraw(&args.category, &args.id).await;
    session.close().await;

    let entry = result?;
    output::print_success(&format!("Withdrew \"{}\"", entry.submission.name));
    Ok(())
}
