// src/model/entities.rs
//! The seven source relations as typed records.
//!
//! Each record deserializes from one CSV row (columns named as in the
//! extracts, camelCase) and lowers to a schema-typed [`Row`] so the join and
//! aggregation layers can work on any relation uniformly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::model::table::{Column, Row, Schema};
use crate::model::types::{DataType, Value};

/// The source relations, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    OrderLines,
    Orders,
    Customers,
    Products,
    Shippers,
    Categories,
    Employees,
}

impl Relation {
    pub const ALL: [Relation; 7] = [
        Relation::OrderLines,
        Relation::Orders,
        Relation::Customers,
        Relation::Products,
        Relation::Shippers,
        Relation::Categories,
        Relation::Employees,
    ];

    /// Table name used for the relation (and for qualified join columns).
    pub fn table_name(&self) -> &'static str {
        match self {
            Relation::OrderLines => "order_details",
            Relation::Orders => "orders",
            Relation::Customers => "customers",
            Relation::Products => "products",
            Relation::Shippers => "shippers",
            Relation::Categories => "categories",
            Relation::Employees => "employees",
        }
    }

    /// Relation for a source name: its table name, or the variant in
    /// snake_case (`order_lines`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Relation::ALL
            .into_iter()
            .find(|r| r.table_name() == name)
            .or(match name.as_str() {
                "order_lines" => Some(Relation::OrderLines),
                _ => None,
            })
    }

    /// Default CSV file name.
    pub fn default_file(&self) -> String {
        format!("{}.csv", self.table_name())
    }

    /// Column that must be unique, if the relation has one.
    pub fn primary_key(&self) -> Option<&'static str> {
        match self {
            Relation::OrderLines => None,
            Relation::Orders => Some("orderID"),
            Relation::Customers => Some("customerID"),
            Relation::Products => Some("productID"),
            Relation::Shippers => Some("shipperID"),
            Relation::Categories => Some("categoryID"),
            Relation::Employees => Some("employeeID"),
        }
    }

    /// Declared schema of the relation.
    pub fn schema(&self) -> Schema {
        use DataType::*;
        let cols: &[(&str, DataType)] = match self {
            Relation::OrderLines => &[
                ("orderID", Int),
                ("productID", Int),
                ("unitPrice", Float),
                ("quantity", Int),
                ("discount", Float),
                ("revenue", Float),
            ],
            Relation::Orders => &[
                ("orderID", Int),
                ("customerID", Text),
                ("employeeID", Int),
                ("orderDate", Date),
                ("requiredDate", Date),
                ("shippedDate", Date),
                ("shipperID", Int),
                ("freight", Float),
            ],
            Relation::Customers => &[
                ("customerID", Text),
                ("companyName", Text),
                ("contactName", Text),
                ("contactTitle", Text),
                ("city", Text),
                ("country", Text),
            ],
            Relation::Products => &[
                ("productID", Int),
                ("productName", Text),
                ("quantityPerUnit", Text),
                ("unitPrice", Float),
                ("discontinued", Bool),
                ("categoryID", Int),
            ],
            Relation::Shippers => &[("shipperID", Int), ("companyName", Text)],
            Relation::Categories => &[
                ("categoryID", Int),
                ("categoryName", Text),
                ("description", Text),
            ],
            Relation::Employees => &[
                ("employeeID", Int),
                ("employeeName", Text),
                ("title", Text),
                ("city", Text),
                ("country", Text),
                ("reportsTo", Int),
            ],
        };
        Schema::new(cols.iter().map(|(n, t)| Column::new(*n, *t)).collect())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// A typed row of one relation.
pub trait Record: DeserializeOwned + Clone {
    const RELATION: Relation;

    /// Primary key as a value, for uniqueness checks.
    fn key(&self) -> Option<Value> {
        None
    }

    /// Values in schema column order.
    fn to_row(&self) -> Row;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: f64,
    pub revenue: f64,
}

impl Record for OrderLine {
    const RELATION: Relation = Relation::OrderLines;

    fn to_row(&self) -> Row {
        vec![
            self.order_id.into(),
            self.product_id.into(),
            self.unit_price.into(),
            self.quantity.into(),
            self.discount.into(),
            self.revenue.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(rename = "employeeID")]
    pub employee_id: i64,
    #[serde(deserialize_with = "optional_date")]
    pub order_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date")]
    pub required_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date")]
    pub shipped_date: Option<NaiveDate>,
    #[serde(rename = "shipperID")]
    pub shipper_id: i64,
    pub freight: f64,
}

impl Record for Order {
    const RELATION: Relation = Relation::Orders;

    fn key(&self) -> Option<Value> {
        Some(self.order_id.into())
    }

    fn to_row(&self) -> Row {
        vec![
            self.order_id.into(),
            self.customer_id.as_str().into(),
            self.employee_id.into(),
            self.order_date.into(),
            self.required_date.into(),
            self.shipped_date.into(),
            self.shipper_id.into(),
            self.freight.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_title: String,
    pub city: String,
    pub country: String,
}

impl Record for Customer {
    const RELATION: Relation = Relation::Customers;

    fn key(&self) -> Option<Value> {
        Some(self.customer_id.as_str().into())
    }

    fn to_row(&self) -> Row {
        vec![
            self.customer_id.as_str().into(),
            self.company_name.as_str().into(),
            self.contact_name.as_str().into(),
            self.contact_title.as_str().into(),
            self.city.as_str().into(),
            self.country.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub product_name: String,
    pub quantity_per_unit: String,
    pub unit_price: f64,
    #[serde(deserialize_with = "flag")]
    pub discontinued: bool,
    #[serde(rename = "categoryID")]
    pub category_id: i64,
}

impl Record for Product {
    const RELATION: Relation = Relation::Products;

    fn key(&self) -> Option<Value> {
        Some(self.product_id.into())
    }

    fn to_row(&self) -> Row {
        vec![
            self.product_id.into(),
            self.product_name.as_str().into(),
            self.quantity_per_unit.as_str().into(),
            self.unit_price.into(),
            self.discontinued.into(),
            self.category_id.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipper {
    #[serde(rename = "shipperID")]
    pub shipper_id: i64,
    pub company_name: String,
}

impl Record for Shipper {
    const RELATION: Relation = Relation::Shippers;

    fn key(&self) -> Option<Value> {
        Some(self.shipper_id.into())
    }

    fn to_row(&self) -> Row {
        vec![self.shipper_id.into(), self.company_name.as_str().into()]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    pub category_name: String,
    pub description: String,
}

impl Record for Category {
    const RELATION: Relation = Relation::Categories;

    fn key(&self) -> Option<Value> {
        Some(self.category_id.into())
    }

    fn to_row(&self) -> Row {
        vec![
            self.category_id.into(),
            self.category_name.as_str().into(),
            self.description.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "employeeID")]
    pub employee_id: i64,
    pub employee_name: String,
    pub title: String,
    pub city: String,
    pub country: String,
    /// Manager's employee ID; null at the top of the hierarchy.
    #[serde(deserialize_with = "optional_id")]
    pub reports_to: Option<i64>,
}

impl Record for Employee {
    const RELATION: Relation = Relation::Employees;

    fn key(&self) -> Option<Value> {
        Some(self.employee_id.into())
    }

    fn to_row(&self) -> Row {
        vec![
            self.employee_id.into(),
            self.employee_name.as_str().into(),
            self.title.as_str().into(),
            self.city.as_str().into(),
            self.country.as_str().into(),
            self.reports_to.into(),
        ]
    }
}

// ============================================================================
// Cell parsers
// ============================================================================

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS[.fff]`, keeping the date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    parse_date(trimmed)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", trimmed)))
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    // Some exports write integer IDs as floats ("2.0").
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid id '{}'", trimmed)))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(D::Error::custom(format!("invalid flag '{}'", other))),
    }
}
