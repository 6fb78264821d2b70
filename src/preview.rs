//! Plain-text rendering of a loaded [`Table`] for the `load` command.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::table::Table;

/// Renders up to `limit` rows (all rows when `limit` is 0) as aligned columns.
pub fn render_table(table: &Table, limit: usize) -> String {
    let headers: Vec<String> = table.fields().names().map(str::to_string).collect();
    let shown = if limit == 0 {
        table.len()
    } else {
        limit.min(table.len())
    };
    let rows: Vec<Vec<String>> = table
        .rows()
        .take(shown)
        .map(|row| row.values().iter().map(|value| value.as_display()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(3))).collect();
    let rule_widths: Vec<usize> = widths.iter().map(|w| (*w).max(3)).collect();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    if shown < table.len() {
        let _ = writeln!(output, "... {} more row(s)", table.len() - shown);
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, (value, width)) in values.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = sanitize_cell(value);
        let padding = width.saturating_sub(display_width(&cell));
        line.push_str(&cell);
        line.push_str(&" ".repeat(padding));
    }
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    value.chars().filter(|c| !c.is_control()).count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\r']) {
        Cow::Owned(value.replace(['\t', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
