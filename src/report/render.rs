//! Plain-text and JSON rendering of report output.
//!
//! This is the command-line stand-in for a presentation layer: charts are
//! printed as their underlying tables.

use inflector::Inflector;

use crate::model::{Table, Value};
use crate::report::output::{MetricFormat, MetricValue, ReportOutput, Section, SectionBody};

/// Columns holding fractions that read better as percentages.
fn is_ratio_column(name: &str) -> bool {
    name.ends_with("_rate") || name == "share"
}

/// Header text for a column: `companyName` → `Company Name`.
///
/// Qualified join columns keep their qualifier: `products.unitPrice` →
/// `Products Unit Price`.
pub fn column_title(name: &str) -> String {
    name.replace('.', " ").to_title_case()
}

fn format_cell(column: &str, value: &Value) -> String {
    match value {
        Value::Float(v) if is_ratio_column(column) => format!("{:.2}%", v * 100.0),
        other => other.to_string(),
    }
}

/// Format a metric the way a dashboard card shows it.
pub fn format_metric(metric: &MetricValue) -> String {
    match (metric.format, &metric.value) {
        (MetricFormat::Currency, Value::Float(v)) => format!("${:.2}", v),
        (_, value) => value.to_string(),
    }
}

/// Render a table with left-aligned text columns and right-aligned numbers.
pub fn render_table(table: &Table) -> String {
    let columns = table.schema.columns();
    let headers: Vec<String> = columns.iter().map(|c| column_title(&c.name)).collect();
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(columns)
                .map(|(v, c)| format_cell(&c.name, v))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if columns[i].data_type.is_numeric() {
                    format!("{:>width$}", cell, width = widths[i])
                } else {
                    format!("{:<width$}", cell, width = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    out.push_str(&line(&headers));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    if cells.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

fn render_section(section: &Section) -> String {
    match &section.body {
        SectionBody::Metric(metric) => format!("{}: {}\n", section.title, format_metric(metric)),
        SectionBody::Table(table) => {
            let mut out = format!("## {}\n\n{}", section.title, render_table(table));
            if let Some(caption) = &section.caption {
                out.push('\n');
                out.push_str(caption);
                out.push('\n');
            }
            out
        }
    }
}

/// Render a whole KPI as text.
pub fn render_text(output: &ReportOutput) -> String {
    let mut out = format!("# {}\n\n", output.title);
    let body: Vec<String> = output.sections.iter().map(render_section).collect();
    let all_metrics = output
        .sections
        .iter()
        .all(|s| matches!(s.body, SectionBody::Metric(_)));
    out.push_str(&body.join(if all_metrics { "" } else { "\n" }));
    out
}

/// Render a whole KPI as pretty-printed JSON.
pub fn render_json(output: &ReportOutput) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}
