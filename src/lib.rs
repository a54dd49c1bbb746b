//! mandi-api - a read-only query service over mandi price records
//!
//! The dataset is loaded once at startup into an immutable [`data::DataStore`]
//! and served through the filtering, statistics and distinct-value queries in
//! [`query`], exposed over HTTP by [`http_server`].

pub mod cli;
pub mod data;
pub mod http_server;
pub mod observability;
pub mod query;
