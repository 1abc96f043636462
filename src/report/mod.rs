//! KPI selection and dispatch.
//!
//! Each [`Kpi`] maps to one pipeline in [`pipelines`]. A pipeline is a pure
//! function of the [`TableStore`] and [`ReportSettings`]: it joins the
//! relations it needs, aggregates, and returns named sections in display
//! order.

pub mod output;
pub mod pipelines;
pub mod render;

pub use output::{Display, MetricFormat, MetricValue, ReportOutput, Section, SectionBody};

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::config::ReportSettings;
use crate::engine::EngineError;
use crate::store::TableStore;

/// Errors that can occur while running a KPI.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Pipeline failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Unknown KPI: {0}")]
    UnknownKpi(String),
}

impl From<crate::engine::JoinError> for ReportError {
    fn from(err: crate::engine::JoinError) -> Self {
        ReportError::Engine(err.into())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

/// The selectable KPI views, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    KeyMetrics,
    SalesTrends,
    ProductPerformance,
    KeyCustomers,
    ShippingCosts,
    KeyCitiesBySales,
    KeyCountriesBySales,
    RevenueByCategory,
    RevenueByCompany,
}

static BY_NAME: Lazy<HashMap<String, Kpi>> = Lazy::new(|| {
    let mut names = HashMap::new();
    for kpi in Kpi::ALL {
        names.insert(normalize(kpi.label()), kpi);
        names.insert(normalize(kpi.slug()), kpi);
    }
    names.insert(normalize("key-cities"), Kpi::KeyCitiesBySales);
    names.insert(normalize("key-countries"), Kpi::KeyCountriesBySales);
    names
});

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl Kpi {
    pub const ALL: [Kpi; 9] = [
        Kpi::KeyMetrics,
        Kpi::SalesTrends,
        Kpi::ProductPerformance,
        Kpi::KeyCustomers,
        Kpi::ShippingCosts,
        Kpi::KeyCitiesBySales,
        Kpi::KeyCountriesBySales,
        Kpi::RevenueByCategory,
        Kpi::RevenueByCompany,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Kpi::KeyMetrics => "Key Metrics",
            Kpi::SalesTrends => "Sales Trends",
            Kpi::ProductPerformance => "Product Performance",
            Kpi::KeyCustomers => "Key Customers",
            Kpi::ShippingCosts => "Shipping Costs",
            Kpi::KeyCitiesBySales => "Key Cities by Sales",
            Kpi::KeyCountriesBySales => "Key Countries by Sales",
            Kpi::RevenueByCategory => "Revenue by Category",
            Kpi::RevenueByCompany => "Revenue by Company",
        }
    }

    /// Command-line name.
    pub fn slug(&self) -> &'static str {
        match self {
            Kpi::KeyMetrics => "key-metrics",
            Kpi::SalesTrends => "sales-trends",
            Kpi::ProductPerformance => "product-performance",
            Kpi::KeyCustomers => "key-customers",
            Kpi::ShippingCosts => "shipping-costs",
            Kpi::KeyCitiesBySales => "key-cities-by-sales",
            Kpi::KeyCountriesBySales => "key-countries-by-sales",
            Kpi::RevenueByCategory => "revenue-by-category",
            Kpi::RevenueByCompany => "revenue-by-company",
        }
    }

    /// Look up a KPI by menu label or slug, ignoring case and punctuation.
    pub fn from_name(name: &str) -> ReportResult<Kpi> {
        BY_NAME
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| ReportError::UnknownKpi(name.to_string()))
    }

    /// Run the KPI's pipeline.
    pub fn run(&self, store: &TableStore, settings: &ReportSettings) -> ReportResult<ReportOutput> {
        let started = Instant::now();
        let sections = match self {
            Kpi::KeyMetrics => pipelines::key_metrics(store)?,
            Kpi::SalesTrends => pipelines::sales_trends(store)?,
            Kpi::ProductPerformance => pipelines::product_performance(store, settings)?,
            Kpi::KeyCustomers => pipelines::key_customers(store, settings)?,
            Kpi::ShippingCosts => pipelines::shipping_costs(store)?,
            Kpi::KeyCitiesBySales => pipelines::key_cities_by_sales(store, settings)?,
            Kpi::KeyCountriesBySales => pipelines::key_countries_by_sales(store, settings)?,
            Kpi::RevenueByCategory => pipelines::revenue_by_category(store)?,
            Kpi::RevenueByCompany => pipelines::revenue_by_company(store, settings)?,
        };
        tracing::info!(
            kpi = self.slug(),
            sections = sections.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "computed KPI"
        );
        Ok(ReportOutput::new(*self, sections))
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run every KPI in menu order.
pub fn run_all(store: &TableStore, settings: &ReportSettings) -> ReportResult<Vec<ReportOutput>> {
    Kpi::ALL.iter().map(|kpi| kpi.run(store, settings)).collect()
}
