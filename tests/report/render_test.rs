//! Tests for text and JSON rendering.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use heron::config::ReportSettings;
use heron::model::{Column, DataType, Schema, Table, Value};
use heron::report::render::{render_json, render_table, render_text};
use heron::report::Kpi;
use insta::assert_snapshot;

#[test]
fn test_render_table_alignment() {
    let table = Table::from_rows(
        "key_cities",
        Schema::new(vec![
            Column::new("city", DataType::Text),
            Column::new("revenue", DataType::Float),
        ]),
        vec![
            vec![Value::text("Cunewalde"), Value::Float(110277.25)],
            vec![Value::text("Boise"), Value::Float(104361.5)],
        ],
    )
    .unwrap();

    assert_snapshot!(render_table(&table), @r"
    City         Revenue
    ---------  ---------
    Cunewalde  110277.25
    Boise      104361.50
    ");
}

#[test]
fn test_render_empty_table() {
    let table = Table::new(
        "key_cities",
        Schema::new(vec![
            Column::new("city", DataType::Text),
            Column::new("revenue", DataType::Float),
        ]),
    );
    assert_snapshot!(render_table(&table), @r"
    City  Revenue
    ----  -------
    (no rows)
    ");
}

#[test]
fn test_render_key_metrics_text() {
    let output = Kpi::KeyMetrics
        .run(&northwind(), &ReportSettings::default())
        .unwrap();
    assert_snapshot!(render_text(&output), @r"
    # Key Metrics

    Revenue: $1142.00
    Freight Cost: $202.46
    Quantity: 84
    Orders: 5
    Products: 3
    Customers: 4
    ");
}

#[test]
fn test_render_retention_as_percent() {
    let output = Kpi::KeyCustomers
        .run(&northwind(), &ReportSettings::default())
        .unwrap();
    let text = render_text(&output);
    assert!(text.contains("## Customer Retention Rate"));
    assert!(text.contains("100.00%"));
    assert!(text.contains("50.00%"));
}

#[test]
fn test_render_json_shape() {
    let output = Kpi::RevenueByCategory
        .run(&northwind(), &ReportSettings::default())
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&output).unwrap()).unwrap();

    assert_eq!(json["kpi"], "revenue_by_category");
    assert_eq!(json["title"], "Revenue by Category");
    let section = &json["sections"][0];
    assert_eq!(section["name"], "revenue_by_category");
    assert_eq!(section["display"], "table");
    assert_eq!(section["body"]["kind"], "table");
    assert_eq!(section["body"]["data"]["schema"][0]["name"], "categoryName");
    assert_eq!(section["body"]["data"]["rows"][0][0], "Beverages");
    assert_eq!(section["body"]["data"]["rows"][0][1], 992.0);
}

#[test]
fn test_render_json_dates() {
    let output = Kpi::SalesTrends
        .run(&northwind(), &ReportSettings::default())
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&output).unwrap()).unwrap();
    let first = &json["sections"][0]["body"]["data"]["rows"][0];
    assert_eq!(first[0], "1996-07-01");
    assert!(json["sections"][3]["body"]["data"]["rows"][0][2].is_null());
}
