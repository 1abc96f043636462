//! One pipeline per KPI.
//!
//! Rows that fail a join on any key simply drop out, so missing data shows up
//! as smaller or empty tables, never as an error.

use crate::config::ReportSettings;
use crate::engine::{
    group_count_distinct, group_mean, group_sum, inner_join, max_column, percent_change, resample,
    sort_by, sum_column, top_n, SortDirection,
};
use crate::model::{DataType, Grain, Relation, Table, Value};
use crate::report::output::{Display, MetricValue, Section};
use crate::report::ReportResult;
use crate::store::TableStore;

const REVENUE: &str = "revenue";
const FREIGHT: &str = "freight";
const QUANTITY: &str = "quantity";
const TOTAL_REVENUE: &str = "total_revenue";
const ORDER_DATE: &str = "orderDate";

/// Scalar totals over the raw relations. No joins.
pub fn key_metrics(store: &TableStore) -> ReportResult<Vec<Section>> {
    let lines = store.table(Relation::OrderLines);
    let orders = store.table(Relation::Orders);

    let revenue = sum_column(&lines, REVENUE)?;
    let freight = sum_column(&orders, FREIGHT)?;
    let quantity = store
        .order_lines()
        .iter()
        .fold(0_i64, |acc, l| acc.saturating_add(l.quantity));

    Ok(vec![
        Section::metric("revenue", "Revenue", MetricValue::currency(revenue)),
        Section::metric("freight_cost", "Freight Cost", MetricValue::currency(freight)),
        Section::metric("quantity", "Quantity", MetricValue::number(quantity)),
        Section::metric(
            "orders",
            "Orders",
            MetricValue::count(store.len(Relation::Orders) as i64),
        ),
        Section::metric(
            "products",
            "Products",
            MetricValue::count(store.len(Relation::Products) as i64),
        ),
        Section::metric(
            "customers",
            "Customers",
            MetricValue::count(store.len(Relation::Customers) as i64),
        ),
    ])
}

/// Revenue by month, quarter and year, plus year-over-year growth.
pub fn sales_trends(store: &TableStore) -> ReportResult<Vec<Section>> {
    let merged = inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Orders),
        "orderID",
    )?;

    let monthly = resample(&merged, ORDER_DATE, Grain::Month, REVENUE)?;
    let quarterly = resample(&merged, ORDER_DATE, Grain::Quarter, REVENUE)?;
    let yearly = resample(&merged, ORDER_DATE, Grain::Year, REVENUE)?;
    let growth = percent_change(&yearly, REVENUE, "growth_rate")?;

    Ok(vec![
        Section::table("monthly_revenue", "Monthly Revenue", Display::LineChart, monthly),
        Section::table(
            "quarterly_revenue",
            "Quarterly Revenue",
            Display::BarChart,
            quarterly,
        ),
        Section::table("yearly_revenue", "Yearly Revenue", Display::LineChart, yearly),
        Section::table(
            "sales_growth_rate",
            "Sales Growth Rate",
            Display::LineChart,
            growth,
        ),
    ])
}

/// Units and revenue per product, and the best sellers' share of revenue.
///
/// Product revenue is recomputed as `quantity × unitPrice` using the price
/// on the order line, not the catalogue price.
pub fn product_performance(
    store: &TableStore,
    settings: &ReportSettings,
) -> ReportResult<Vec<Section>> {
    let lines = store.table(Relation::OrderLines);
    let products = store.table(Relation::Products);
    let names = products.project(&["productID", "productName"])?;

    let units = group_sum(&lines, "productID", QUANTITY)?;
    let units_sold =
        inner_join(&units, &names, "productID")?.project(&["productID", "productName", QUANTITY])?;

    let joined = inner_join(&lines, &products, "productID")?;
    let line_price = format!("{}.unitPrice", lines.name);
    let qty = joined.require(QUANTITY)?;
    let price = joined.require(&line_price)?;
    let priced = joined.with_column(TOTAL_REVENUE, DataType::Float, |row| {
        match (row[qty].as_f64(), row[price].as_f64()) {
            (Some(q), Some(p)) => Value::Float(q * p),
            _ => Value::Null,
        }
    })?;
    let by_product = group_sum(&priced, "productID", TOTAL_REVENUE)?;
    let revenue_by_product = inner_join(&by_product, &names, "productID")?.project(&[
        "productID",
        "productName",
        TOTAL_REVENUE,
    ])?;

    let best = top_n(&revenue_by_product, settings.top_n, TOTAL_REVENUE)?;
    let best_total = sum_column(&best, TOTAL_REVENUE)?;
    let total_idx = best.require(TOTAL_REVENUE)?;
    let best_selling = best.with_column("share", DataType::Float, |row| {
        match row[total_idx].as_f64() {
            Some(v) if best_total != 0.0 => Value::Float(v / best_total),
            _ => Value::Null,
        }
    })?;

    Ok(vec![
        Section::table(
            "units_sold",
            "Total Units Sold by Product",
            Display::BarChart,
            units_sold,
        ),
        Section::table(
            "revenue_by_product",
            "Revenue by Product",
            Display::BarChart,
            revenue_by_product,
        ),
        Section::table(
            "best_selling_products",
            "Best-Selling Products",
            Display::PieChart,
            best_selling,
        ),
    ])
}

/// Revenue per customer, order-count retention, and customers above the
/// revenue threshold.
pub fn key_customers(store: &TableStore, settings: &ReportSettings) -> ReportResult<Vec<Section>> {
    let orders = store.table(Relation::Orders);
    let with_customers = inner_join(&orders, &store.table(Relation::Customers), "customerID")?;
    let joined = inner_join(&with_customers, &store.table(Relation::OrderLines), "orderID")?;
    let revenue_per_customer = group_sum(&joined, "customerID", REVENUE)?;

    // Retention: each customer's distinct orders relative to the most loyal customer.
    let order_counts =
        group_count_distinct(&orders, "customerID", "orderID")?.rename("orderID", "order_count")?;
    let most_orders = max_column(&order_counts, "order_count")?;
    let count_idx = order_counts.require("order_count")?;
    let retention = order_counts.with_column("retention_rate", DataType::Float, |row| {
        match (row[count_idx].as_f64(), most_orders) {
            (Some(count), Some(max)) if max > 0.0 => Value::Float(count / max),
            _ => Value::Null,
        }
    })?;
    let retention = sort_by(&retention, "retention_rate", SortDirection::Desc)?;

    let threshold = settings.key_customer_threshold;
    let revenue_idx = revenue_per_customer.require(REVENUE)?;
    let key = revenue_per_customer.filter(|row| {
        row[revenue_idx]
            .as_f64()
            .is_some_and(|revenue| revenue > threshold)
    });
    let key = sort_by(&key, REVENUE, SortDirection::Desc)?;

    Ok(vec![
        Section::table(
            "revenue_per_customer",
            "Total Revenue per Customer",
            Display::BarChart,
            revenue_per_customer,
        ),
        Section::table(
            "retention_rate",
            "Customer Retention Rate",
            Display::Table,
            retention,
        ),
        Section::table("key_customers", "Key Customers", Display::Table, key),
    ])
}

/// Average freight per order and total freight per shipping company.
pub fn shipping_costs(store: &TableStore) -> ReportResult<Vec<Section>> {
    let orders = store.table(Relation::Orders);
    let avg_per_order = group_mean(&orders, "orderID", FREIGHT)?;

    let with_shippers = inner_join(&orders, &store.table(Relation::Shippers), "shipperID")?;
    let by_shipper = group_sum(&with_shippers, "companyName", FREIGHT)?;

    Ok(vec![
        Section::table(
            "avg_shipping_cost",
            "Average Shipping Cost per Order",
            Display::BarChart,
            avg_per_order,
        ),
        Section::table(
            "shipping_cost_by_shipper",
            "Shipping Cost by Shipper",
            Display::BarChart,
            by_shipper,
        ),
    ])
}

/// Orders ⋈ Customers ⋈ OrderLines, revenue summed by a customer dimension.
fn customer_sales_by(store: &TableStore, dimension: &str) -> ReportResult<Table> {
    let with_customers = inner_join(
        &store.table(Relation::Orders),
        &store.table(Relation::Customers),
        "customerID",
    )?;
    let joined = inner_join(&with_customers, &store.table(Relation::OrderLines), "orderID")?;
    Ok(group_sum(&joined, dimension, REVENUE)?)
}

fn top_caption(count: usize, noun: &str, measure: &str) -> String {
    format!("The top {} {} with the highest {} are listed above.", count, noun, measure)
}

/// Chart plus captioned table of the top entries of a ranking.
fn ranked_sections(name: &str, title: &str, noun: &str, ranked: Table) -> Vec<Section> {
    let caption = top_caption(ranked.len(), noun, "sales");
    vec![
        Section::table(
            &format!("{}_chart", name),
            title,
            Display::BarChart,
            ranked.clone(),
        ),
        Section::table(name, title, Display::Table, ranked).with_caption(caption),
    ]
}

/// Cities ranked by revenue of their customers' orders.
pub fn key_cities_by_sales(
    store: &TableStore,
    settings: &ReportSettings,
) -> ReportResult<Vec<Section>> {
    let key_cities = top_n(&customer_sales_by(store, "city")?, settings.top_n, REVENUE)?;
    Ok(ranked_sections(
        "key_cities",
        "Key Cities by Sales",
        "cities",
        key_cities,
    ))
}

/// Countries ranked by revenue of their customers' orders.
pub fn key_countries_by_sales(
    store: &TableStore,
    settings: &ReportSettings,
) -> ReportResult<Vec<Section>> {
    let key_countries = top_n(&customer_sales_by(store, "country")?, settings.top_n, REVENUE)?;
    Ok(ranked_sections(
        "key_countries",
        "Key Countries by Sales",
        "countries",
        key_countries,
    ))
}

/// Revenue per product category, highest first.
pub fn revenue_by_category(store: &TableStore) -> ReportResult<Vec<Section>> {
    let with_products = inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Products),
        "productID",
    )?;
    let joined = inner_join(&with_products, &store.table(Relation::Categories), "categoryID")?;
    let by_category = group_sum(&joined, "categoryName", REVENUE)?;
    let by_category = sort_by(&by_category, REVENUE, SortDirection::Desc)?;

    Ok(vec![Section::table(
        "revenue_by_category",
        "Revenue by Category",
        Display::Table,
        by_category,
    )])
}

/// Revenue per customer company, with the top earners called out.
pub fn revenue_by_company(
    store: &TableStore,
    settings: &ReportSettings,
) -> ReportResult<Vec<Section>> {
    let with_orders = inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Orders),
        "orderID",
    )?;
    let joined = inner_join(&with_orders, &store.table(Relation::Customers), "customerID")?;
    let by_company = group_sum(&joined, "companyName", REVENUE)?;
    let top_companies = top_n(&by_company, settings.top_n, REVENUE)?;
    let caption = top_caption(top_companies.len(), "companies", "revenue");

    Ok(vec![
        Section::table(
            "revenue_by_company",
            "Revenue by Company",
            Display::BarChart,
            by_company,
        ),
        Section::table(
            "top_companies",
            "Top Revenue-Generating Companies",
            Display::Table,
            top_companies,
        )
        .with_caption(caption),
    ])
}
