//! Result types handed to the presentation layer.

use serde::Serialize;

use crate::model::{Table, Value};
use crate::report::Kpi;

/// How the presentation layer should show a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Metric,
    LineChart,
    BarChart,
    PieChart,
    Table,
}

/// Formatting hint for a scalar metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFormat {
    /// Two decimals with a `$` prefix.
    Currency,
    /// Number of distinct entities.
    Count,
    /// Plain total of a measure.
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: Value,
    pub format: MetricFormat,
}

impl MetricValue {
    pub fn currency(value: f64) -> Self {
        Self {
            value: Value::Float(value),
            format: MetricFormat::Currency,
        }
    }

    pub fn count(value: i64) -> Self {
        Self {
            value: Value::Int(value),
            format: MetricFormat::Count,
        }
    }

    pub fn number(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            format: MetricFormat::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionBody {
    Metric(MetricValue),
    Table(Table),
}

/// One named result of a KPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Stable identifier, e.g. `monthly_revenue`.
    pub name: String,
    pub title: String,
    pub display: Display,
    pub body: SectionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Section {
    pub fn metric(name: &str, title: &str, value: MetricValue) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            display: Display::Metric,
            body: SectionBody::Metric(value),
            caption: None,
        }
    }

    pub fn table(name: &str, title: &str, display: Display, table: Table) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            display,
            body: SectionBody::Table(table.named(name)),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.body {
            SectionBody::Table(t) => Some(t),
            SectionBody::Metric(_) => None,
        }
    }

    pub fn as_metric(&self) -> Option<&MetricValue> {
        match &self.body {
            SectionBody::Metric(m) => Some(m),
            SectionBody::Table(_) => None,
        }
    }
}

/// Everything one KPI produces, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutput {
    pub kpi: Kpi,
    pub title: String,
    pub sections: Vec<Section>,
}

impl ReportOutput {
    pub fn new(kpi: Kpi, sections: Vec<Section>) -> Self {
        Self {
            kpi,
            title: kpi.label().to_string(),
            sections,
        }
    }

    /// Section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Table of a section by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.section(name).and_then(Section::as_table)
    }
}
