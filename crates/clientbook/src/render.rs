//! Text and JSON rendering for the client views.
//!
//! Renderers are pure: they take records and view state and return the
//! string to print.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::client::Client;
use crate::error::Result;
use crate::suggestions::{ExerciseSummary, UNAVAILABLE_PLACEHOLDER};
use crate::validate::ValidationIssue;
use crate::view::SuggestionPanel;

const EMPTY_LIST: &str = "No clients found.";
const MISSING: &str = "-";
const TABLE_HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Email",
    "Phone",
    "Goal",
    "Start Date",
];

/// Render the list view.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn render_list(clients: &[&Client], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(clients)?),
        _ if clients.is_empty() => Ok(EMPTY_LIST.to_string()),
        OutputFormat::Table => Ok(render_table(clients)),
        OutputFormat::Plain => Ok(clients
            .iter()
            .map(|client| {
                format!(
                    "{}  {} <{}>  started {}",
                    client.id(),
                    client.full_name,
                    client.email,
                    client.start_date
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn table_row(client: &Client) -> [String; 8] {
    [
        client.id().to_string(),
        client.full_name.clone(),
        client
            .age
            .map_or_else(|| MISSING.to_string(), |age| age.to_string()),
        or_missing(client.gender.as_deref()),
        client.email.clone(),
        or_missing(client.phone.as_deref()),
        or_missing(Some(client.fitness_goal.as_str())),
        client.start_date.clone(),
    ]
}

fn render_table(clients: &[&Client]) -> String {
    let rows: Vec<[String; 8]> = clients.iter().map(|client| table_row(client)).collect();

    let mut widths = TABLE_HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &TABLE_HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").as_str());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailJson<'a> {
    client: &'a Client,
    suggestions: Option<&'a [ExerciseSummary]>,
    suggestions_unavailable: bool,
}

/// Render the detail view with its suggestion panel.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn render_detail(client: &Client, panel: &SuggestionPanel, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let body = DetailJson {
            client,
            suggestions: match panel {
                SuggestionPanel::Ready(items) => Some(items.as_slice()),
                _ => None,
            },
            suggestions_unavailable: *panel == SuggestionPanel::Unavailable,
        };
        return Ok(serde_json::to_string_pretty(&body)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", client.full_name);
    let _ = writeln!(out, "{}", "=".repeat(client.full_name.chars().count().max(1)));
    let _ = writeln!(out, "  ID:          {}", client.id());
    let _ = writeln!(
        out,
        "  Age:         {}",
        client.age.map_or_else(|| MISSING.to_string(), |a| a.to_string())
    );
    let _ = writeln!(out, "  Gender:      {}", or_missing(client.gender.as_deref()));
    let _ = writeln!(out, "  Email:       {}", client.email);
    let _ = writeln!(out, "  Phone:       {}", or_missing(client.phone.as_deref()));
    let _ = writeln!(out, "  Goal:        {}", or_missing(Some(client.fitness_goal.as_str())));
    let _ = writeln!(out, "  Start date:  {}", display_start_date(client));

    match panel {
        SuggestionPanel::Hidden => {}
        SuggestionPanel::Loading => {
            let _ = write!(out, "\nSuggested exercises:\n  Loading...\n");
        }
        SuggestionPanel::Unavailable => {
            let _ = write!(out, "\nSuggested exercises:\n  {UNAVAILABLE_PLACEHOLDER}\n");
        }
        SuggestionPanel::Ready(items) if items.is_empty() => {
            let _ = write!(out, "\nSuggested exercises:\n  None found.\n");
        }
        SuggestionPanel::Ready(items) => {
            out.push_str("\nSuggested exercises:\n");
            for item in items {
                let _ = writeln!(out, "  * {}", item.name);
                if !item.description.is_empty() {
                    let _ = writeln!(out, "    {}", item.description);
                }
            }
        }
    }

    out.truncate(out.trim_end().len());
    Ok(out)
}

fn display_start_date(client: &Client) -> String {
    match client.start_date_parsed() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => {
            warn!(id = %client.id(), start_date = %client.start_date, "Unparsable start date");
            client.start_date.clone()
        }
    }
}

/// The inline message shown when a form submit is rejected.
#[must_use]
pub fn render_form_error(issue: ValidationIssue) -> String {
    format!("Cannot save client: {issue}")
}
