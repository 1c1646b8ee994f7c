//! CSV export of sales rows for the current window
//!
//! Writes the rows a dashboard page would show for the selected period so
//! they can be opened in a spreadsheet.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::comparison::SaleRecord;
use crate::window::DerivedWindow;

const COLUMNS: [&str; 6] = [
    "date",
    "country_code",
    "gross_units_sold",
    "gross_sales_usd",
    "net_units_sold",
    "net_sales_usd",
];

/// Export the rows of `records` inside the current window to CSV
///
/// An all-time window exports every row. Absent values are written as empty
/// fields; fields holding the delimiter, a quote or a newline are quoted.
///
/// # Arguments
/// * `records` - Sales rows, dates in `yyyy/mm/dd`
/// * `window` - Window whose current range selects the rows
/// * `path` - Destination file path (created/overwritten)
/// * `delimiter` - Field separator, usually `,` or `;`
///
/// Returns the number of data rows written.
///
/// # Errors
/// Returns error if file creation or write operations fail
pub fn export_sales_to_csv(
    records: &[SaleRecord],
    window: &DerivedWindow,
    path: &Path,
    delimiter: char,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let sep = delimiter.to_string();

    writeln!(writer, "{}", COLUMNS.join(&sep)).context("Failed to write CSV header")?;

    let mut written = 0;
    for record in records
        .iter()
        .filter(|r| window.is_unbounded() || window.is_in_current_period(&r.date))
    {
        let fields = [
            escape(&record.date, delimiter),
            escape(record.country_code.as_deref().unwrap_or(""), delimiter),
            opt(record.gross_units_sold),
            opt(record.gross_sales_usd),
            opt(record.net_units_sold),
            opt(record.net_sales_usd),
        ];
        writeln!(writer, "{}", fields.join(&sep))
            .with_context(|| format!("Failed to write row for {}", record.date))?;
        written += 1;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    tracing::info!(
        rows = written,
        skipped = records.len() - written,
        "Exported sales to {}",
        path.display()
    );
    Ok(written)
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
