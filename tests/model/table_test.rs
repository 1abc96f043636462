#[path = "../common/mod.rs"]
mod common;

use common::*;
use heron::model::{DataType, Relation, Value};

#[test]
fn test_store_tables_match_schemas() {
    let store = northwind();
    for relation in Relation::ALL {
        let table = store.table(relation);
        assert_eq!(table.name, relation.table_name());
        assert_eq!(table.len(), store.len(relation));
        for row in &table.rows {
            assert_eq!(row.len(), table.schema.len());
            for (value, column) in row.iter().zip(table.schema.columns()) {
                if let Some(t) = value.data_type() {
                    assert_eq!(t, column.data_type, "{}.{}", relation, column.name);
                }
            }
        }
    }
}

#[test]
fn test_customer_id_is_text_everywhere() {
    let store = northwind();
    for relation in [Relation::Orders, Relation::Customers] {
        let column = store
            .table(relation)
            .schema
            .column("customerID")
            .cloned()
            .unwrap();
        assert_eq!(column.data_type, DataType::Text);
    }
}

#[test]
fn test_with_column_derives_values() {
    let lines = northwind().table(Relation::OrderLines);
    let qty = lines.require("quantity").unwrap();
    let price = lines.require("unitPrice").unwrap();
    let priced = lines
        .with_column("line_total", DataType::Float, |row| {
            Value::Float(row[qty].as_f64().unwrap() * row[price].as_f64().unwrap())
        })
        .unwrap();
    assert_eq!(priced.get(0, "line_total"), Some(&Value::Float(168.0)));
    assert_eq!(priced.schema.len(), lines.schema.len() + 1);
}

#[test]
fn test_with_column_rejects_mistyped_values() {
    let lines = northwind().table(Relation::OrderLines);
    let result = lines.with_column("flag", DataType::Bool, |_| Value::Int(1));
    assert!(result.is_err());
}

#[test]
fn test_rename_column() {
    let shippers = northwind().table(Relation::Shippers);
    let renamed = shippers.rename("companyName", "shipper").unwrap();
    assert!(renamed.schema.index_of("shipper").is_some());
    assert!(renamed.schema.index_of("companyName").is_none());
    assert!(shippers.rename("missing", "x").is_err());
}
