//! Item submission.

use clap::Args;

use crate::output::{self, OutputFormat};
use votehub_core::error::AppError;

/// Arguments for the submit command
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Voter name
    #[arg(short, long)]
    pub voter: String,

    /// Name to credit instead of the voter
    #[arg(short, long)]
    pub submitter: Option<String>,

    /// Category ID
    pub category: String,

    /// Item name
    pub name: String,
}

/// Execute the submit command
pub async fn execute(args: &SubmitArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::connect(&config)?;
    let session = super::open_session(store, &config, &args.voter).await?;

    let result = session
        .submit(&args.category, &args.name, args.submitter.as_deref())
        .await;
    session.close().await;

    let entry = result?;
    match format {
        OutputFormat::Json => output::print_item(&entry, format),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Added \"{}\" to {}",
                entry.submission.name, entry.category_id
            ));
            output::print_kv("ID", &entry.id);
            output::print_kv("Vote key", &entry.item_key().to_string());
        }
    }
    Ok(())
}
