//! Typed relations and the generic table they lower to.

pub mod entities;
pub mod table;
pub mod types;

pub use entities::{
    Category, Customer, Employee, Order, OrderLine, Product, Record, Relation, Shipper,
};
pub use table::{Column, Row, Schema, Table};
pub use types::{DataType, Grain, Value};
