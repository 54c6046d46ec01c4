//! Two-voter walkthrough against an in-memory store.

use std::sync::Arc;

use clap::Args;

use crate::output::{self, OutputFormat};
use votehub_core::config::AppConfig;
use votehub_core::error::AppError;
use votehub_core::traits::store::SyncStore;
use votehub_entity::ItemKey;
use votehub_store::memory::MemoryStore;

/// Arguments for the demo command
#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Category to show after voting
    #[arg(short, long, default_value = "hispanic")]
    pub category: String,
}

/// Execute the demo command
pub async fn execute(args: &DemoArgs, format: OutputFormat) -> Result<(), AppError> {
    let config = AppConfig::default();
    let store: Arc<dyn SyncStore> = Arc::new(MemoryStore::new());

    let ana = super::open_session(store.clone(), &config, "Ana").await?;
    let luis = super::open_session(store.clone(), &config, "Luis").await?;

    let flow = ItemKey::parse("hispanic-ConversaFlow")?;
    let amiga = ItemKey::parse("hispanic-AmigaAI")?;
    ana.toggle_vote(&flow).await?;
    luis.toggle_vote(&flow).await?;
    ana.toggle_vote(&amiga).await?;
    luis.submit("hispanic", "PuenteVivo", None).await?;

    let live = luis.live_users().len();
    luis.with_aggregator(|agg| {
        super::tally::print_tally(agg, luis.catalog(), Some(&args.category), live, format)
    })?;

    output::print_heading("Activity");
    for notification in luis.feed().recent(0) {
        println!("  [{}] {}", notification.kind, notification.message);
    }

    ana.close().await;
    luis.close().await;
    Ok(())
}
