// 📄 HTML Report
// Static table of the whole Catalog in stored order

use crate::catalog::Catalog;
use crate::normalizer::Record;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const TEMPLATE: &str = include_str!("../templates/report.html");

/// Default report file name
pub const DEFAULT_OUTPUT: &str = "output.html";

/// Render the report: one row per record, numbered from 1.
///
/// Columns: number, name, price, weight, source file, unit price.
pub fn render_html(catalog: &Catalog, generated_at: DateTime<Local>) -> String {
    let mut rows = String::new();
    for (number, record) in catalog.iter().enumerate() {
        push_row(&mut rows, number + 1, record);
    }

    // rows last so product names can't inject placeholders
    TEMPLATE
        .replace("{{count}}", &catalog.len().to_string())
        .replace(
            "{{generated_at}}",
            &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .replace("{{rows}}", &rows)
}

fn push_row(out: &mut String, number: usize, record: &Record) {
    // Writing to a String can't fail
    let _ = write!(
        out,
        "    <tr>\n\
         \x20       <td>{}</td>\n\
         \x20       <td>{}</td>\n\
         \x20       <td>{}</td>\n\
         \x20       <td>{}</td>\n\
         \x20       <td>{}</td>\n\
         \x20       <td>{}</td>\n\
         \x20   </tr>\n",
        number,
        escape_html(record.name()),
        record.price(),
        record.weight(),
        escape_html(record.source_label()),
        format_unit_price(record.unit_price()),
    );
}

/// One decimal always shown: 50.0, 33.3
pub fn format_unit_price(value: f64) -> String {
    format!("{:.1}", value)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write the report to `path` and return the path written
pub fn export_html(catalog: &Catalog, path: &Path) -> Result<PathBuf> {
    let html = render_html(catalog, Local::now());
    fs::write(path, html)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!("exported {} record(s) to {}", catalog.len(), path.display());
    Ok(path.to_path_buf())
}
