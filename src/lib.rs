//! # Heron
//!
//! A KPI reporting engine over relational CSV extracts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            CSV extracts (orders, order lines,            │
//! │   customers, products, shippers, categories, employees)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │          TableStore (typed records + key indexes)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine::join]
//! ┌─────────────────────────────────────────────────────────┐
//! │             Denormalized, schema-typed Tables            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine::aggregate, engine::time]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Grouped / ranked / time-bucketed results          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ReportOutput per KPI → presentation layer (external)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use heron::config::Settings;
//! use heron::report::{render, Kpi};
//! use heron::store::TableStore;
//!
//! let settings = Settings::load()?;
//! let store = TableStore::load(&settings.data)?;
//! let output = Kpi::from_name("Key Customers")?.run(&store, &settings.reports)?;
//! println!("{}", render::render_text(&output));
//! ```

pub mod config;
pub mod engine;
pub mod model;
pub mod report;
pub mod store;
pub mod telemetry;

pub use config::Settings;
pub use engine::{inner_join, EngineError, JoinError};
pub use model::{Table, Value};
pub use report::{Kpi, ReportError, ReportOutput};
pub use store::{LoadError, TableStore};
