//! # Statistics Aggregation
//!
//! Summary statistics over a (possibly commodity-filtered) set of records.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::filter::{narrow, Filter, FilterEngine, MatchMode};
use crate::data::{Attribute, DataStore, Record};

/// Number of records reported in `topMarkets`
pub const TOP_MARKETS: usize = 5;

/// Price summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    /// Lowest `min_price`
    pub min_price: f64,
    /// Highest `max_price`
    pub max_price: f64,
    /// Arithmetic mean of `modal_price`
    pub avg_modal_price: f64,
}

/// Records grouped by state, groups in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateGroups<'a> {
    groups: Vec<(&'a str, Vec<&'a Record>)>,
}

impl<'a> StateGroups<'a> {
    fn from_records(records: &[&'a Record]) -> Self {
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut groups: Vec<(&'a str, Vec<&'a Record>)> = Vec::new();

        for &record in records {
            let state = record.state.as_str();
            match positions.get(state) {
                Some(&idx) => groups[idx].1.push(record),
                None => {
                    positions.insert(state, groups.len());
                    groups.push((state, vec![record]));
                }
            }
        }

        Self { groups }
    }

    /// State names, in group order
    pub fn states(&self) -> Vec<&'a str> {
        self.groups.iter().map(|(state, _)| *state).collect()
    }

    /// Records for one state (exact, case-sensitive name)
    pub fn get(&self, state: &str) -> Option<&[&'a Record]> {
        self.groups
            .iter()
            .find(|(name, _)| *name == state)
            .map(|(_, records)| records.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for StateGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (state, records) in &self.groups {
            map.serialize_entry(state, records)?;
        }
        map.end()
    }
}

/// Aggregate statistics for a selection of records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats<'a> {
    pub total_records: usize,
    /// Distinct commodities, first-occurrence order
    pub unique_commodities: Vec<&'a str>,
    pub price_stats: PriceStats,
    /// Highest modal prices first
    pub top_markets: Vec<&'a Record>,
    pub statewise: StateGroups<'a>,
}

/// Computes [`Stats`]
pub struct StatsAggregator;

impl StatsAggregator {
    /// Records considered for a stats request: everything, or only the
    /// given commodity (case-insensitive exact match).
    pub fn select<'a>(store: &'a DataStore, commodity: Option<&str>) -> Vec<&'a Record> {
        let records = FilterEngine::new(store).all();
        match commodity.filter(|c| !c.is_empty()) {
            Some(commodity) => narrow(
                records,
                &[Filter::new(Attribute::Commodity, commodity)],
                MatchMode::Exact,
            ),
            None => records,
        }
    }

    /// Summarize `records`. Returns `None` for an empty selection.
    ///
    /// The input order is left untouched; the top-markets ranking is made
    /// on a copy, and state groups follow input order.
    pub fn aggregate<'a>(records: &[&'a Record]) -> Option<Stats<'a>> {
        if records.is_empty() {
            return None;
        }

        let min_price = records
            .iter()
            .map(|r| r.min_price)
            .fold(f64::INFINITY, f64::min);
        let max_price = records
            .iter()
            .map(|r| r.max_price)
            .fold(f64::NEG_INFINITY, f64::max);
        let avg_modal_price =
            records.iter().map(|r| r.modal_price).sum::<f64>() / records.len() as f64;

        let mut seen = HashSet::new();
        let unique_commodities = records
            .iter()
            .map(|r| r.commodity.as_str())
            .filter(|c| seen.insert(*c))
            .collect();

        // Stable sort: ties keep input order
        let mut top_markets = records.to_vec();
        top_markets.sort_by(|a, b| {
            b.modal_price
                .partial_cmp(&a.modal_price)
                .unwrap_or(Ordering::Equal)
        });
        top_markets.truncate(TOP_MARKETS);

        Some(Stats {
            total_records: records.len(),
            unique_commodities,
            price_stats: PriceStats {
                min_price,
                max_price,
                avg_modal_price,
            },
            top_markets,
            statewise: StateGroups::from_records(records),
        })
    }

    /// Select and summarize in one step
    pub fn for_commodity<'a>(store: &'a DataStore, commodity: Option<&str>) -> Option<Stats<'a>> {
        Self::aggregate(&Self::select(store, commodity))
    }
}
