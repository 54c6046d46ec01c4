//! Current results, read once from the store.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use votehub_core::error::AppError;
use votehub_core::traits::store::SyncStore;
use votehub_core::types::time::now_millis;
use votehub_entity::{Catalog, LedgerSnapshot, PresenceSnapshot, SubmissionSnapshot};
use votehub_realtime::aggregate::{Aggregator, RankedItem};
use votehub_store::paths;

/// Arguments for the tally command
#[derive(Debug, Args)]
pub struct TallyArgs {
    /// Only show one category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Also show this voter's selections
    #[arg(short, long)]
    pub voter: Option<String>,
}

/// Ranked item display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct RankRow {
    /// Item name
    item: String,
    /// Votes
    votes: usize,
    /// Share of voters
    percent: String,
    /// Badge
    badge: String,
    /// Who submitted it
    submitter: String,
}

impl From<&RankedItem> for RankRow {
    fn from(row: &RankedItem) -> Self {
        Self {
            item: row.key.display_name().to_string(),
            votes: row.popularity.count,
            percent: format!("{}%", row.popularity.percentage),
            badge: row.badge.to_string(),
            submitter: row.submitter.clone().unwrap_or_default(),
        }
    }
}

/// Print the ranking of one or all categories plus the headline numbers.
pub fn print_tally(
    aggregator: &Aggregator<'_>,
    catalog: &Catalog,
    category: Option<&str>,
    live_users: usize,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ids: Vec<&str> = match category {
        Some(id) => vec![catalog.require(id)?.id.as_str()],
        None => catalog.iter().map(|c| c.id.as_str()).collect(),
    };

    for id in ids {
        let rows: Vec<RankRow> = aggregator
            .ranked_items(id)?
            .iter()
            .map(RankRow::from)
            .collect();
        output::print_heading(id);
        output::print_list(&rows, format);
    }

    let standings = aggregator.standings(live_users);
    output::print_heading("Standings");
    output::print_kv("Voters", &standings.voters.to_string());
    output::print_kv("Live users", &standings.live_users.to_string());
    output::print_kv("Submissions", &standings.total_submissions.to_string());
    Ok(())
}

/// Execute the tally command
pub async fn execute(args: &TallyArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::connect(&config)?;
    let catalog = Catalog::seeded();

    let ledger = LedgerSnapshot::from_value(&store.read(&paths::votes()).await?)?;
    let submissions = SubmissionSnapshot::from_value(&store.read(&paths::submissions()).await?)?;
    let presence = PresenceSnapshot::from_value(&store.read(&paths::active_users()).await?)?;

    for rejected in [&ledger.rejected, &submissions.rejected, &presence.rejected] {
        if !rejected.is_empty() {
            output::print_warning(&format!("Skipped malformed entries: {}", rejected.join(", ")));
        }
    }

    let now = now_millis();
    let window = config.presence.freshness_window_ms();
    let live = presence
        .value
        .iter()
        .filter(|(_, entry)| entry.is_fresh(now, window))
        .count();

    let aggregator = Aggregator::new(&ledger.value, &catalog, &submissions.value);
    print_tally(&aggregator, &catalog, args.category.as_deref(), live, format)?;

    if let Some(voter) = &args.voter {
        let favorites: Vec<String> = aggregator
            .favorites(voter)
            .iter()
            .map(|k| k.to_string())
            .collect();
        output::print_heading(&format!("{voter} ({} votes)", aggregator.voter_totals(voter)));
        for key in favorites {
            println!("  {key}");
        }
    }

    Ok(())
}
