//! # Filter Engine
//!
//! Interprets `(type, value)` pairs taken from the request path as a chain
//! of attribute filters and narrows the dataset with them, left to right.
//!
//! Two matching modes exist and the caller picks one:
//!
//! - [`MatchMode::Substring`]: the lower-cased attribute contains the
//!   lower-cased value. Used by the general `/api/commodities/...` endpoint.
//! - [`MatchMode::Exact`]: the lower-cased attribute equals the lower-cased
//!   value. Used by the strict `/api/commodity/...` endpoint and by every
//!   query-string refinement.
//!
//! All filter types are validated before any filter is applied, so a bad
//! type never leaves a partially filtered result behind.

use serde::Deserialize;

use super::errors::QueryResult;
use crate::data::{Attribute, DataStore, Record};

/// How a filter value is compared against a record attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive "contains"
    Substring,
    /// Case-insensitive equality
    Exact,
}

impl MatchMode {
    /// `needle` must already be lower-cased.
    fn matches(self, haystack: &str, needle: &str) -> bool {
        if haystack.is_ascii() && needle.is_ascii() {
            return self.matches_ascii(haystack.as_bytes(), needle.as_bytes());
        }

        let haystack = haystack.to_lowercase();
        match self {
            MatchMode::Substring => haystack.contains(needle),
            MatchMode::Exact => haystack == needle,
        }
    }

    /// Allocation-free comparison for ASCII input
    fn matches_ascii(self, haystack: &[u8], needle: &[u8]) -> bool {
        match self {
            MatchMode::Substring => {
                needle.is_empty()
                    || haystack
                        .windows(needle.len())
                        .any(|window| window.eq_ignore_ascii_case(needle))
            }
            MatchMode::Exact => haystack.eq_ignore_ascii_case(needle),
        }
    }
}

/// A validated attribute filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub attribute: Attribute,
    needle: String,
}

impl Filter {
    pub fn new(attribute: Attribute, value: &str) -> Self {
        Self {
            attribute,
            needle: value.to_lowercase(),
        }
    }

    /// The lower-cased value this filter compares against
    pub fn value(&self) -> &str {
        &self.needle
    }

    /// Check if a record satisfies this filter under the given mode
    pub fn matches(&self, record: &Record, mode: MatchMode) -> bool {
        mode.matches(record.attribute(self.attribute), &self.needle)
    }

    /// Build the filter chain for a sequence of path pairs.
    ///
    /// Pairs missing either half are skipped without validation. Every
    /// remaining type is checked before the chain is returned.
    pub fn from_path_pairs(pairs: &[PathPair]) -> QueryResult<Vec<Filter>> {
        pairs
            .iter()
            .filter_map(PathPair::complete)
            .map(|(kind, value)| {
                kind.parse::<Attribute>()
                    .map(|attribute| Filter::new(attribute, value))
            })
            .collect()
    }
}

/// One `type/value` pair of path segments, either half possibly absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPair {
    pub kind: Option<String>,
    pub value: Option<String>,
}

impl PathPair {
    pub fn new(kind: Option<String>, value: Option<String>) -> Self {
        Self { kind, value }
    }

    /// A pair with both halves present
    pub fn full(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Some(kind.into()), Some(value.into()))
    }

    /// Both halves, if both are present and non-empty
    fn complete(&self) -> Option<(&str, &str)> {
        match (self.kind.as_deref(), self.value.as_deref()) {
            (Some(kind), Some(value)) if !kind.is_empty() && !value.is_empty() => {
                Some((kind, value))
            }
            _ => None,
        }
    }
}

/// Exact-match refinements taken from the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRefinement {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
}

impl QueryRefinement {
    /// Filters for every non-empty parameter, in state, district, commodity, market order
    pub fn filters(&self) -> Vec<Filter> {
        Attribute::ALL
            .iter()
            .filter_map(|&attribute| {
                let value = match attribute {
                    Attribute::State => &self.state,
                    Attribute::District => &self.district,
                    Attribute::Commodity => &self.commodity,
                    Attribute::Market => &self.market,
                };
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| Filter::new(attribute, v))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filters().is_empty()
    }
}

/// Applies filter chains to a [`DataStore`]
pub struct FilterEngine<'a> {
    store: &'a DataStore,
}

impl<'a> FilterEngine<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Every record, in load order
    pub fn all(&self) -> Vec<&'a Record> {
        self.store.records().iter().collect()
    }

    /// Apply `filters` to the whole dataset as a logical AND
    pub fn apply(&self, filters: &[Filter], mode: MatchMode) -> Vec<&'a Record> {
        narrow(self.all(), filters, mode)
    }

    /// General filtering: substring matching on path filters, then exact
    /// matching on each query-string refinement.
    pub fn general(
        &self,
        pairs: &[PathPair],
        refinement: &QueryRefinement,
    ) -> QueryResult<Vec<&'a Record>> {
        let path_filters = Filter::from_path_pairs(pairs)?;

        let records = self.apply(&path_filters, MatchMode::Substring);
        Ok(narrow(records, &refinement.filters(), MatchMode::Exact))
    }

    /// Strict filtering: exact matching on every path filter.
    ///
    /// An empty result is not an error here; the caller decides.
    pub fn strict(&self, pairs: &[PathPair]) -> QueryResult<Vec<&'a Record>> {
        let filters = Filter::from_path_pairs(pairs)?;
        Ok(self.apply(&filters, MatchMode::Exact))
    }
}

/// Narrow an already filtered sequence, each filter in turn
pub fn narrow<'a>(
    mut records: Vec<&'a Record>,
    filters: &[Filter],
    mode: MatchMode,
) -> Vec<&'a Record> {
    for filter in filters {
        records.retain(|record| filter.matches(record, mode));
    }
    records
}
