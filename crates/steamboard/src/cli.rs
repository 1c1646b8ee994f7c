//! Output formatting for CLI commands
//!
//! Every formatter renders either a comfy-table (human) or pretty JSON.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde_json::json;
use std::path::Path;
use steamboard_core::{
    capitalize, format_date, OptionsStore, PeriodComparison, Settings, PERIOD_CATALOG,
};

/// Shown for absent boundaries (all-time, or the start of "today")
const UNBOUNDED: &str = "-";

// ============================================================================
// Formatters
// ============================================================================

/// Period selector contents
pub fn format_periods(json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(&PERIOD_CATALOG).unwrap_or_else(|_| "[]".to_string());
    }

    let mut table = new_table(&["Code", "Label", "Days"], no_color);
    for option in PERIOD_CATALOG.iter() {
        let code = if option.value.is_all_time() {
            "all".to_string()
        } else {
            option.value.code().to_string()
        };
        table.add_row(vec![
            code,
            option.label.to_string(),
            option.value.span_days().to_string(),
        ]);
    }
    table.to_string()
}

/// Current and previous window for the selected period
pub fn format_window(options: &OptionsStore, json: bool, no_color: bool) -> String {
    if json {
        let value = json!({
            "now": options.now(),
            "period": options.period(),
            "span_days": options.span_days(),
            "from": options.from(),
            "to": options.to(),
            "previous_from": options.previous_from(),
            "previous_to": options.previous_to(),
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!(
        "Period:     {} ({})",
        options.period().label(),
        options.period()
    ));
    lines.push(format!("Reference:  {}", options.now()));

    let mut table = new_table(&["Window", "From", "To"], no_color);
    table.add_row(vec![
        "Current".to_string(),
        or_unbounded(options.from()),
        or_unbounded(options.to()),
    ]);
    table.add_row(vec![
        "Previous".to_string(),
        or_unbounded(options.previous_from()),
        or_unbounded(options.previous_to()),
    ]);
    lines.push(table.to_string());

    lines.join("\n")
}

/// Totals for both windows plus a country breakdown
pub fn format_comparison(comparison: &PeriodComparison, json: bool, no_color: bool) -> String {
    if json {
        let value = json!({
            "comparison": comparison,
            "change_pct": comparison.change_pct(),
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    }

    let window = &comparison.window;
    let mut lines = vec![];
    lines.push(format!(
        "{} sales, {}",
        capitalize(&comparison.sales_type.to_string()),
        window.period.label()
    ));

    let mut table = new_table(&["Window", "Dates", "Rows", "Units", "Revenue"], no_color);
    table.add_row(vec![
        "Current".to_string(),
        date_span(window.current_from_str(), window.current_to_str()),
        comparison.current.records.to_string(),
        comparison.current.units.to_string(),
        format_usd(comparison.current.revenue_usd),
    ]);
    if !window.is_unbounded() {
        table.add_row(vec![
            "Previous".to_string(),
            date_span(window.previous_from_str(), window.previous_to_str()),
            comparison.previous.records.to_string(),
            comparison.previous.units.to_string(),
            format_usd(comparison.previous.revenue_usd),
        ]);
    }
    lines.push(table.to_string());

    if !window.is_unbounded() {
        lines.push(format!(
            "Change:     {}",
            comparison
                .change_pct()
                .map(format_pct)
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }

    let countries = comparison.by_country();
    if !countries.is_empty() {
        let mut by_country = new_table(&["Country", "Revenue"], no_color);
        for (code, revenue) in countries.iter().take(10) {
            by_country.add_row(vec![code.to_string(), format_usd(*revenue)]);
        }
        lines.push(by_country.to_string());
    }

    lines.join("\n")
}

/// Settings summary; the API key is never printed in full
pub fn format_settings(settings: &Settings, configured: bool, path: &Path, json: bool) -> String {
    let masked = settings.steam_api_key.as_deref().map(mask_key);

    if json {
        let value = json!({
            "path": path.display().to_string(),
            "configured": configured,
            "id": settings.id,
            "steam_api_key": masked,
            "poll_interval": settings.poll_interval,
            "highwatermark": settings.highwatermark,
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!("File:           {}", path.display()));
    lines.push(format!("Configured:     {}", configured));
    lines.push(format!(
        "API key:        {}",
        masked.as_deref().unwrap_or(UNBOUNDED)
    ));
    lines.push(format!("Poll interval:  {}s", settings.poll_interval));
    lines.push(format!("Highwatermark:  {}", settings.highwatermark));
    lines.join("\n")
}

// ============================================================================
// Utilities
// ============================================================================

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn or_unbounded(date: Option<String>) -> String {
    date.unwrap_or_else(|| UNBOUNDED.to_string())
}

/// "Mon 10 Jun - Sun 16 Jun" style span; absent ends render as "-"
fn date_span(from: Option<String>, to: Option<String>) -> String {
    format!(
        "{} - {}",
        format_date(from.as_deref(), None, UNBOUNDED),
        format_date(to.as_deref(), None, UNBOUNDED)
    )
}

fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn format_pct(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        "*".repeat(count)
    } else {
        let tail: String = key.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }
}

// ============================================================================
// Tests
// ============================================================================
