//! Tests for time bucketing and percent change.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use heron::engine::{inner_join, percent_change, resample, PERIOD_START};
use heron::model::{Grain, Relation, Table, Value};

fn sales() -> Table {
    let store = northwind();
    inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Orders),
        "orderID",
    )
    .unwrap()
}

fn periods(table: &Table) -> Vec<Value> {
    table.values(PERIOD_START).unwrap().cloned().collect()
}

#[test]
fn test_monthly_omits_empty_months() {
    let monthly = resample(&sales(), "orderDate", Grain::Month, "revenue").unwrap();
    assert_eq!(
        monthly.rows,
        vec![
            vec![Value::Date(date(1996, 7, 1)), Value::Float(568.0)],
            vec![Value::Date(date(1996, 10, 1)), Value::Float(420.0)],
            vec![Value::Date(date(1997, 2, 1)), Value::Float(140.0)],
        ]
    );
}

#[test]
fn test_quarterly_and_yearly() {
    let quarterly = resample(&sales(), "orderDate", Grain::Quarter, "revenue").unwrap();
    assert_eq!(
        quarterly.rows,
        vec![
            vec![Value::Date(date(1996, 7, 1)), Value::Float(988.0)],
            vec![Value::Date(date(1997, 1, 1)), Value::Float(140.0)],
        ]
    );

    let yearly = resample(&sales(), "orderDate", Grain::Year, "revenue").unwrap();
    assert_eq!(
        periods(&yearly),
        vec![Value::Date(date(1996, 1, 1)), Value::Date(date(1997, 1, 1))]
    );
}

#[test]
fn test_periods_strictly_increasing() {
    for grain in [Grain::Month, Grain::Quarter, Grain::Year] {
        let buckets = resample(&sales(), "orderDate", grain, "revenue").unwrap();
        let starts = periods(&buckets);
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "{grain}");
    }
}

#[test]
fn test_resample_reconciles_with_total() {
    let sales = sales();
    let total: f64 = sales.values("revenue").unwrap().filter_map(Value::as_f64).sum();
    for grain in [Grain::Month, Grain::Quarter, Grain::Year] {
        let buckets = resample(&sales, "orderDate", grain, "revenue").unwrap();
        let bucketed: f64 = buckets.values("revenue").unwrap().filter_map(Value::as_f64).sum();
        assert_close(bucketed, total);
    }
}

#[test]
fn test_null_dates_skipped() {
    let mut store_orders = orders();
    store_orders[0].order_date = None;
    let store = heron::store::TableStore::from_parts(
        order_lines(),
        store_orders,
        vec![],
        vec![],
        vec![],
        vec![],
        vec![],
    );
    let merged = inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Orders),
        "orderID",
    )
    .unwrap();
    let monthly = resample(&merged, "orderDate", Grain::Month, "revenue").unwrap();
    // Order 10248 (268.0 of July's revenue) no longer has a date.
    assert_eq!(monthly.rows[0], vec![Value::Date(date(1996, 7, 1)), Value::Float(300.0)]);
}

#[test]
fn test_percent_change_first_is_null() {
    let yearly = resample(&sales(), "orderDate", Grain::Year, "revenue").unwrap();
    let growth = percent_change(&yearly, "revenue", "growth_rate").unwrap();
    let rates: Vec<Value> = growth.values("growth_rate").unwrap().cloned().collect();
    assert_eq!(rates[0], Value::Null);
    assert_close(rates[1].as_f64().unwrap(), (140.0 - 988.0) / 988.0);
}

#[test]
fn test_empty_input() {
    let store = empty_store();
    let merged = inner_join(
        &store.table(Relation::OrderLines),
        &store.table(Relation::Orders),
        "orderID",
    )
    .unwrap();
    let monthly = resample(&merged, "orderDate", Grain::Month, "revenue").unwrap();
    assert!(monthly.is_empty());
    assert!(percent_change(&monthly, "revenue", "growth_rate").unwrap().is_empty());
}
