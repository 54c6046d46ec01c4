//! Vote toggling.

use clap::Args;

use crate::output::{self, OutputFormat};
use votehub_core::error::AppError;
use votehub_entity::ItemKey;

/// Arguments for the vote command
#[derive(Debug, Args)]
pub struct VoteArgs {
    /// Voter name
    #[arg(short, long)]
    pub voter: String,

    /// Item key, e.g. `speed-TurboFlow` or `speed-user-Rayo`
    pub item: String,
}

/// Execute the vote command
pub async fn execute(args: &VoteArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let item = ItemKey::parse(&args.item)?;

    let config = super::load_config(config_path)?;
    let store = super::connect(&config)?;
    let session = super::open_session(store, &config, &args.voter).await?;

    let result = session.toggle_vote(&item).await;
    let totals = session.with_aggregator(|agg| agg.voter_totals(session.voter()));
    session.close().await;

    let outcome = result?;
    match format {
        OutputFormat::Json => output::print_item(&outcome, format),
        OutputFormat::Table if outcome.selected => {
            output::print_success(&format!("Voted for \"{}\"", item.display_name()));
        }
        OutputFormat::Table => {
            output::print_success(&format!("Vote for \"{}\" removed", item.display_name()));
        }
    }
    output::print_kv("Your votes", &totals.to_string());
    Ok(())
}
