//! Command implementations for the CLI
//!
//! - compare: sweep a volume range and report break-even points
//! - cost: breakdown at a single volume
//! - catalog: list pricing tables
//! - config: configuration display and validation

pub mod catalog;
pub mod compare;
pub mod config;
pub mod cost;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Table with the shared look and a cyan header row
fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Format large numbers with K/M/B suffix
fn format_count(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn format_usd(amount: f64) -> String {
    format!("${:.4}", amount)
}

fn format_local(amount: f64, code: &str) -> String {
    format!("{:.2} {}", amount, code)
}
