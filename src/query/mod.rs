//! # Query Engine
//!
//! Filtering, aggregation and distinct-value listing over the dataset.
//! Every operation is a linear scan of the in-memory records; there are
//! no indexes.

pub mod errors;
pub mod filter;
pub mod stats;
pub mod unique;

pub use errors::{QueryError, QueryResult};
pub use filter::{narrow, Filter, FilterEngine, MatchMode, PathPair, QueryRefinement};
pub use stats::{PriceStats, StateGroups, Stats, StatsAggregator};
pub use unique::{Category, UniqueValues, UniqueValuesIndex};
