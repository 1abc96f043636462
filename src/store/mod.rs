//! The table store: the seven source relations, loaded once and read-only.

mod error;
pub mod loader;

pub use error::{LoadError, LoadResult};
pub use loader::{decode, load_source, parse_records, Encoding};

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::DataSettings;
use crate::model::{
    Category, Customer, Employee, Order, OrderLine, Product, Record, Relation, Shipper, Table,
};

/// Load a single relation by source name (`orders`, `order_details`, ...)
/// straight to a table.
pub fn load_table(settings: &DataSettings, source_name: &str) -> LoadResult<Table> {
    let relation = Relation::from_name(source_name)
        .ok_or_else(|| LoadError::UnknownSource(source_name.to_string()))?;
    let path = settings.path_for(relation)?;
    let encoding = settings.encoding;
    Ok(match relation {
        Relation::OrderLines => to_table(&load_source::<OrderLine>(&path, encoding)?),
        Relation::Orders => to_table(&load_source::<Order>(&path, encoding)?),
        Relation::Customers => to_table(&load_source::<Customer>(&path, encoding)?),
        Relation::Products => to_table(&load_source::<Product>(&path, encoding)?),
        Relation::Shippers => to_table(&load_source::<Shipper>(&path, encoding)?),
        Relation::Categories => to_table(&load_source::<Category>(&path, encoding)?),
        Relation::Employees => to_table(&load_source::<Employee>(&path, encoding)?),
    })
}

/// Records of one relation plus a primary-key index.
#[derive(Debug, Clone)]
struct Keyed<K, T> {
    records: Vec<T>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash, T> Keyed<K, T> {
    fn new(records: Vec<T>, key: impl Fn(&T) -> K) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (key(r), i))
            .collect();
        Self { records, index }
    }

    fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(key).map(|&i| &self.records[i])
    }
}

/// Immutable in-memory copy of the source relations.
#[derive(Debug, Clone)]
pub struct TableStore {
    order_lines: Vec<OrderLine>,
    orders: Keyed<i64, Order>,
    customers: Keyed<String, Customer>,
    products: Keyed<i64, Product>,
    shippers: Keyed<i64, Shipper>,
    categories: Keyed<i64, Category>,
    employees: Keyed<i64, Employee>,
}

impl TableStore {
    /// Load every relation from the configured data directory.
    pub fn load(settings: &DataSettings) -> LoadResult<Self> {
        let encoding = settings.encoding;
        let path = |relation| settings.path_for(relation);
        Ok(Self::from_parts(
            load_source(&path(Relation::OrderLines)?, encoding)?,
            load_source(&path(Relation::Orders)?, encoding)?,
            load_source(&path(Relation::Customers)?, encoding)?,
            load_source(&path(Relation::Products)?, encoding)?,
            load_source(&path(Relation::Shippers)?, encoding)?,
            load_source(&path(Relation::Categories)?, encoding)?,
            load_source(&path(Relation::Employees)?, encoding)?,
        ))
    }

    /// Build a store from records already in memory.
    ///
    /// Primary keys are assumed unique; when they are not, lookups return the
    /// last record with the key.
    pub fn from_parts(
        order_lines: Vec<OrderLine>,
        orders: Vec<Order>,
        customers: Vec<Customer>,
        products: Vec<Product>,
        shippers: Vec<Shipper>,
        categories: Vec<Category>,
        employees: Vec<Employee>,
    ) -> Self {
        Self {
            order_lines,
            orders: Keyed::new(orders, |o| o.order_id),
            customers: Keyed::new(customers, |c| c.customer_id.clone()),
            products: Keyed::new(products, |p| p.product_id),
            shippers: Keyed::new(shippers, |s| s.shipper_id),
            categories: Keyed::new(categories, |c| c.category_id),
            employees: Keyed::new(employees, |e| e.employee_id),
        }
    }

    pub fn order_lines(&self) -> &[OrderLine] {
        &self.order_lines
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders.records
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers.records
    }

    pub fn products(&self) -> &[Product] {
        &self.products.records
    }

    pub fn shippers(&self) -> &[Shipper] {
        &self.shippers.records
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories.records
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees.records
    }

    pub fn order(&self, order_id: i64) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.get(customer_id)
    }

    pub fn product(&self, product_id: i64) -> Option<&Product> {
        self.products.get(&product_id)
    }

    pub fn shipper(&self, shipper_id: i64) -> Option<&Shipper> {
        self.shippers.get(&shipper_id)
    }

    pub fn category(&self, category_id: i64) -> Option<&Category> {
        self.categories.get(&category_id)
    }

    pub fn employee(&self, employee_id: i64) -> Option<&Employee> {
        self.employees.get(&employee_id)
    }

    /// Direct manager of an employee.
    pub fn manager_of(&self, employee_id: i64) -> Option<&Employee> {
        self.employee(employee_id)
            .and_then(|e| e.reports_to)
            .and_then(|id| self.employee(id))
    }

    /// Row count of a relation.
    pub fn len(&self, relation: Relation) -> usize {
        match relation {
            Relation::OrderLines => self.order_lines.len(),
            Relation::Orders => self.orders.records.len(),
            Relation::Customers => self.customers.records.len(),
            Relation::Products => self.products.records.len(),
            Relation::Shippers => self.shippers.records.len(),
            Relation::Categories => self.categories.records.len(),
            Relation::Employees => self.employees.records.len(),
        }
    }

    /// A relation as a schema-typed table.
    pub fn table(&self, relation: Relation) -> Table {
        match relation {
            Relation::OrderLines => to_table(&self.order_lines),
            Relation::Orders => to_table(&self.orders.records),
            Relation::Customers => to_table(&self.customers.records),
            Relation::Products => to_table(&self.products.records),
            Relation::Shippers => to_table(&self.shippers.records),
            Relation::Categories => to_table(&self.categories.records),
            Relation::Employees => to_table(&self.employees.records),
        }
    }
}

/// Lower typed records to a table. Record rows match their relation's
/// schema by construction.
fn to_table<T: Record>(records: &[T]) -> Table {
    let relation = T::RELATION;
    Table {
        name: relation.table_name().to_string(),
        schema: relation.schema(),
        rows: records.iter().map(Record::to_row).collect(),
    }
}
