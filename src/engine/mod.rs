//! Relational operations over in-memory tables.
//!
//! Two layers:
//! 1. Join: `inner_join` widens rows across relations on a shared key
//! 2. Aggregate: group/reduce a measure by a dimension, rank, bucket by time

pub mod aggregate;
pub mod error;
pub mod join;
pub mod time;

pub use aggregate::{
    count_distinct, group_count_distinct, group_mean, group_sum, max_column, sort_by, sum_column,
    top_n, SortDirection,
};
pub use error::{EngineError, EngineResult, JoinError};
pub use join::inner_join;
pub use time::{percent_change, resample, PERIOD_START};
