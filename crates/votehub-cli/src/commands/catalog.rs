//! Catalog listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use votehub_core::error::AppError;
use votehub_entity::Catalog;

/// Arguments for the catalog command
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Show the seed items of one category
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Category display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CategoryRow {
    /// Category ID
    id: String,
    /// Title
    title: String,
    /// Subtitle
    subtitle: String,
    /// Seed count
    seeds: usize,
}

/// Seed item display row for table output
#[derive(Debug, Serialize, Tabled)]
struct SeedRow {
    /// Position in the category
    position: usize,
    /// Vote key
    key: String,
    /// Display name
    name: String,
}

/// Execute the catalog command
pub async fn execute(args: &CatalogArgs, format: OutputFormat) -> Result<(), AppError> {
    let catalog = Catalog::seeded();

    match &args.category {
        Some(id) => {
            let category = catalog.require(id)?;
            let rows: Vec<SeedRow> = category
                .seed_keys()
                .enumerate()
                .map(|(i, key)| SeedRow {
                    position: i + 1,
                    name: key.display_name().to_string(),
                    key: key.to_string(),
                })
                .collect();
            output::print_heading(&format!("{} · {}", category.title, category.subtitle));
            output::print_list(&rows, format);
        }
        None => {
            let rows: Vec<CategoryRow> = catalog
                .iter()
                .map(|c| CategoryRow {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    subtitle: c.subtitle.clone(),
                    seeds: c.seed_names.len(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
