//! End-to-end tests for each KPI pipeline over the shared fixture.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use heron::config::ReportSettings;
use heron::model::{Table, Value};
use heron::report::{self, Display, Kpi, MetricFormat, ReportOutput, SectionBody};
use heron::store::TableStore;

fn run(kpi: Kpi) -> ReportOutput {
    kpi.run(&northwind(), &ReportSettings::default()).unwrap()
}

fn column(table: &Table, name: &str) -> Vec<Value> {
    table.values(name).unwrap().cloned().collect()
}

fn texts(table: &Table, name: &str) -> Vec<String> {
    table.values(name).unwrap().map(|v| v.to_string()).collect()
}

fn floats(table: &Table, name: &str) -> Vec<f64> {
    table.values(name).unwrap().filter_map(Value::as_f64).collect()
}

#[test]
fn test_key_metrics() {
    let output = run(Kpi::KeyMetrics);
    let metric = |name: &str| output.section(name).unwrap().as_metric().unwrap().clone();

    assert_close(metric("revenue").value.as_f64().unwrap(), 1142.0);
    assert_eq!(metric("revenue").format, MetricFormat::Currency);
    assert_close(metric("freight_cost").value.as_f64().unwrap(), 202.46);
    assert_eq!(metric("quantity").value, Value::Int(84));
    assert_eq!(metric("quantity").format, MetricFormat::Number);
    assert_eq!(metric("orders").format, MetricFormat::Count);
    assert_eq!(metric("orders").value, Value::Int(5));
    assert_eq!(metric("products").value, Value::Int(3));
    assert_eq!(metric("customers").value, Value::Int(4));
    assert!(output.sections.iter().all(|s| s.display == Display::Metric));
}

#[test]
fn test_sales_trends() {
    let output = run(Kpi::SalesTrends);
    let names: Vec<&str> = output.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "monthly_revenue",
            "quarterly_revenue",
            "yearly_revenue",
            "sales_growth_rate"
        ]
    );

    let monthly = output.table("monthly_revenue").unwrap();
    assert_eq!(floats(monthly, "revenue"), vec![568.0, 420.0, 140.0]);

    let growth = output.table("sales_growth_rate").unwrap();
    let rates = column(growth, "growth_rate");
    assert_eq!(rates[0], Value::Null);
    assert_close(rates[1].as_f64().unwrap(), (140.0 - 988.0) / 988.0);
}

#[test]
fn test_product_performance() {
    let output = run(Kpi::ProductPerformance);

    let units = output.table("units_sold").unwrap();
    assert_eq!(texts(units, "productName"), vec!["Chai", "Chang", "Aniseed Syrup"]);
    assert_eq!(
        column(units, "quantity"),
        vec![Value::Int(43), Value::Int(26), Value::Int(15)]
    );

    // Revenue uses the order-line price (14.0 for Chai), not the list price (18.0).
    let revenue = output.table("revenue_by_product").unwrap();
    assert_eq!(floats(revenue, "total_revenue"), vec![602.0, 390.0, 150.0]);

    let best = output.table("best_selling_products").unwrap();
    assert_eq!(output.section("best_selling_products").unwrap().display, Display::PieChart);
    assert_eq!(texts(best, "productName"), vec!["Chai", "Chang", "Aniseed Syrup"]);
    let shares = floats(best, "share");
    assert_close(shares.iter().sum(), 1.0);
    assert_close(shares[0], 602.0 / 1142.0);
}

#[test]
fn test_product_performance_top_n_setting() {
    let settings = ReportSettings::default().with_top_n(2);
    let output = Kpi::ProductPerformance.run(&northwind(), &settings).unwrap();
    let best = output.table("best_selling_products").unwrap();
    assert_eq!(best.len(), 2);
    assert_close(floats(best, "share")[1], 390.0 / 992.0);
}

#[test]
fn test_key_customers() {
    let settings = ReportSettings::default().with_threshold(250.0);
    let output = Kpi::KeyCustomers.run(&northwind(), &settings).unwrap();

    let per_customer = output.table("revenue_per_customer").unwrap();
    assert_eq!(texts(per_customer, "customerID"), vec!["ALFKI", "ANTON", "BONAP"]);
    assert_eq!(floats(per_customer, "revenue"), vec![688.0, 300.0, 90.0]);

    let retention = output.table("retention_rate").unwrap();
    assert_eq!(
        texts(retention, "customerID"),
        vec!["ALFKI", "ANTON", "BONAP", "ZZZZZ"]
    );
    assert_eq!(floats(retention, "retention_rate"), vec![1.0, 0.5, 0.5, 0.5]);
    assert_eq!(
        column(retention, "order_count"),
        vec![Value::Int(2), Value::Int(1), Value::Int(1), Value::Int(1)]
    );

    let key = output.table("key_customers").unwrap();
    assert_eq!(texts(key, "customerID"), vec!["ALFKI", "ANTON"]);
}

#[test]
fn test_key_customers_default_threshold() {
    let store = TableStore::from_parts(
        vec![line(1, 1, 100.0, 150, 15000.0), line(2, 1, 100.0, 50, 5000.0)],
        vec![
            order(1, "A", date(1997, 1, 1), 1, 0.0),
            order(2, "B", date(1997, 1, 2), 1, 0.0),
        ],
        vec![
            customer("A", "Alpha", "Bern", "Switzerland"),
            customer("B", "Beta", "Graz", "Austria"),
        ],
        vec![],
        vec![],
        vec![],
        vec![],
    );
    let output = Kpi::KeyCustomers.run(&store, &ReportSettings::default()).unwrap();
    let key = output.table("key_customers").unwrap();
    assert_eq!(key.rows, vec![vec![Value::text("A"), Value::Float(15000.0)]]);
}

#[test]
fn test_shipping_costs() {
    let output = run(Kpi::ShippingCosts);

    let avg = output.table("avg_shipping_cost").unwrap();
    assert_eq!(avg.len(), 5);
    assert_close(floats(avg, "freight")[0], 32.38);

    let by_shipper = output.table("shipping_cost_by_shipper").unwrap();
    assert_eq!(
        texts(by_shipper, "companyName"),
        vec!["Federal Shipping", "Speedy Express", "United Package"]
    );
    let totals = floats(by_shipper, "freight");
    assert_close(totals[0], 32.38);
    assert_close(totals[1], 11.61 + 41.34);
    assert_close(totals[2], 65.83 + 51.30);
}

#[test]
fn test_key_cities_and_countries() {
    let cities = run(Kpi::KeyCitiesBySales);
    let table = cities.table("key_cities").unwrap();
    assert_eq!(texts(table, "city"), vec!["Berlin", "México D.F.", "Marseille"]);
    assert_eq!(floats(table, "revenue"), vec![688.0, 300.0, 90.0]);
    let names: Vec<&str> = cities.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["key_cities_chart", "key_cities"]);
    assert_eq!(cities.sections[0].display, Display::BarChart);
    assert_eq!(cities.sections[1].display, Display::Table);
    assert_eq!(cities.table("key_cities_chart").unwrap().rows, table.rows);
    let caption = cities.section("key_cities").unwrap().caption.as_deref();
    assert!(caption.unwrap().contains("top 3 cities"));

    let countries = run(Kpi::KeyCountriesBySales);
    let table = countries.table("key_countries").unwrap();
    assert_eq!(texts(table, "country"), vec!["Germany", "Mexico", "France"]);
    assert!(countries.table("key_countries_chart").is_some());
}

#[test]
fn test_key_cities_truncates_to_top_n() {
    let settings = ReportSettings::default().with_top_n(1);
    let output = Kpi::KeyCitiesBySales.run(&northwind(), &settings).unwrap();
    let table = output.table("key_cities").unwrap();
    assert_eq!(texts(table, "city"), vec!["Berlin"]);
}

#[test]
fn test_revenue_by_category() {
    let output = run(Kpi::RevenueByCategory);
    let table = output.table("revenue_by_category").unwrap();
    // Includes the line of order 99999: category joins do not go through orders.
    assert_eq!(texts(table, "categoryName"), vec!["Beverages", "Condiments"]);
    assert_eq!(floats(table, "revenue"), vec![992.0, 150.0]);
}

#[test]
fn test_revenue_by_company() {
    let settings = ReportSettings::default().with_top_n(2);
    let output = Kpi::RevenueByCompany.run(&northwind(), &settings).unwrap();

    let all = output.table("revenue_by_company").unwrap();
    assert_eq!(
        texts(all, "companyName"),
        vec!["Alfreds Futterkiste", "Antonio Moreno Taquería", "Bon app'"]
    );

    let top = output.table("top_companies").unwrap();
    assert_eq!(floats(top, "revenue"), vec![688.0, 300.0]);
}

#[test]
fn test_empty_store_yields_empty_results() {
    let outputs = report::run_all(&empty_store(), &ReportSettings::default()).unwrap();
    assert_eq!(outputs.len(), Kpi::ALL.len());

    for output in &outputs {
        for section in &output.sections {
            match &section.body {
                SectionBody::Table(table) => {
                    assert!(table.is_empty(), "{} / {}", output.kpi, section.name)
                }
                SectionBody::Metric(metric) => {
                    assert_eq!(metric.value.as_f64(), Some(0.0), "{}", section.name)
                }
            }
        }
    }
}

#[test]
fn test_empty_order_lines_empty_revenue_results() {
    let store = without_order_lines();
    let settings = ReportSettings::default();

    let revenue_sections = [
        (Kpi::SalesTrends, "monthly_revenue"),
        (Kpi::SalesTrends, "sales_growth_rate"),
        (Kpi::ProductPerformance, "units_sold"),
        (Kpi::ProductPerformance, "revenue_by_product"),
        (Kpi::ProductPerformance, "best_selling_products"),
        (Kpi::KeyCustomers, "revenue_per_customer"),
        (Kpi::KeyCustomers, "key_customers"),
        (Kpi::KeyCitiesBySales, "key_cities"),
        (Kpi::KeyCitiesBySales, "key_cities_chart"),
        (Kpi::KeyCountriesBySales, "key_countries"),
        (Kpi::RevenueByCategory, "revenue_by_category"),
        (Kpi::RevenueByCompany, "revenue_by_company"),
        (Kpi::RevenueByCompany, "top_companies"),
    ];
    for (kpi, section) in revenue_sections {
        let output = kpi.run(&store, &settings).unwrap();
        assert!(output.table(section).unwrap().is_empty(), "{kpi} / {section}");
    }

    // Order-only results are unaffected.
    let shipping = Kpi::ShippingCosts.run(&store, &settings).unwrap();
    assert_eq!(shipping.table("avg_shipping_cost").unwrap().len(), 5);
}

#[test]
fn test_dispatch_by_name() {
    let output = Kpi::from_name("Revenue by Category")
        .unwrap()
        .run(&northwind(), &ReportSettings::default())
        .unwrap();
    assert_eq!(output.kpi, Kpi::RevenueByCategory);
    assert_eq!(output.title, "Revenue by Category");
}
