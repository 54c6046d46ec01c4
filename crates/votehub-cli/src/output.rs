//! Rendering of catalogs, rankings and vote results on the terminal.
//!
//! Every command accepts `--format`; tables go to people, JSON goes to
//! scripts. Status lines always go to the terminal as plain text.

use serde::Serialize;
use tabled::{Table, Tabled};

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading.
    #[default]
    Table,
    /// Pretty-printed JSON for piping into other tools.
    Json,
}

/// Render rows such as ranked items or category listings.
///
/// An empty table prints a short notice instead of bare headers; empty
/// JSON is still `[]` so scripts can parse it.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("Nothing to show yet.");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Render one result, e.g. a toggle outcome or a new submission.
pub fn print_item<T: Serialize + std::fmt::Debug>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{value:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Blank line, then a section title (category name, "Live voters", ...).
pub fn print_heading(title: &str) {
    println!();
    println!("{title}");
}

/// A completed action: vote recorded, entry withdrawn.
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Something the voter should notice but that did not fail.
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// A failed action; written to stderr.
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

// Labels are padded so a block of standings lines up.
pub fn print_kv(label: &str, value: &str) {
    println!("  {:<24} {}", format!("{label}:"), value);
}
