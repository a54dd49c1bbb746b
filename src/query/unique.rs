//! # Distinct Values
//!
//! Lists the distinct states, districts, commodities and markets in the
//! dataset. Recomputed from the full record set on every call.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::data::{Attribute, DataStore, Record};

/// A category of distinct values, named by its plural
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    States,
    Districts,
    Commodities,
    Markets,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::States,
        Category::Districts,
        Category::Commodities,
        Category::Markets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::States => "states",
            Category::Districts => "districts",
            Category::Commodities => "commodities",
            Category::Markets => "markets",
        }
    }

    /// The record attribute this category lists
    pub fn attribute(&self) -> Attribute {
        match self {
            Category::States => Attribute::State,
            Category::Districts => Attribute::District,
            Category::Commodities => Attribute::Commodity,
            Category::Markets => Attribute::Market,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Distinct values of every category, each in first-occurrence order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueValues<'a> {
    pub states: Vec<&'a str>,
    pub districts: Vec<&'a str>,
    pub commodities: Vec<&'a str>,
    pub markets: Vec<&'a str>,
}

impl<'a> UniqueValues<'a> {
    pub fn get(&self, category: Category) -> &[&'a str] {
        match category {
            Category::States => &self.states,
            Category::Districts => &self.districts,
            Category::Commodities => &self.commodities,
            Category::Markets => &self.markets,
        }
    }

    /// A `{ "<category>": [...] }` view of a single category
    pub fn only(&self, category: Category) -> SingleCategory<'_, 'a> {
        SingleCategory {
            category,
            values: self.get(category),
        }
    }
}

/// One category serialized under its own name
#[derive(Debug)]
pub struct SingleCategory<'v, 'a> {
    category: Category,
    values: &'v [&'a str],
}

impl Serialize for SingleCategory<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.category.as_str(), self.values)?;
        map.end()
    }
}

/// Computes [`UniqueValues`]
pub struct UniqueValuesIndex;

impl UniqueValuesIndex {
    pub fn compute(store: &DataStore) -> UniqueValues<'_> {
        let records = store.records();
        UniqueValues {
            states: distinct(records, Attribute::State),
            districts: distinct(records, Attribute::District),
            commodities: distinct(records, Attribute::Commodity),
            markets: distinct(records, Attribute::Market),
        }
    }
}

/// Distinct values of one attribute, first-occurrence order, case-sensitive
pub fn distinct(records: &[Record], attribute: Attribute) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.attribute(attribute))
        .filter(|v| seen.insert(*v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> DataStore {
        DataStore::from_records(vec![
            Record::new("Karnataka", "Bangalore", "A", "Rice", 10.0, 20.0, 15.0),
            Record::new("Kerala", "Kollam", "B", "Banana", 8.0, 25.0, 16.0),
            Record::new("Karnataka", "Mysore", "A", "Rice", 12.0, 18.0, 14.0),
            Record::new("karnataka", "Mysore", "C", "Rice", 12.0, 18.0, 14.0),
        ])
    }

    #[test]
    fn test_distinct_first_occurrence() {
        let store = store();
        let unique = UniqueValuesIndex::compute(&store);

        assert_eq!(unique.states, vec!["Karnataka", "Kerala", "karnataka"]);
        assert_eq!(unique.districts, vec!["Bangalore", "Kollam", "Mysore"]);
        assert_eq!(unique.commodities, vec!["Rice", "Banana"]);
        assert_eq!(unique.markets, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("markets".parse::<Category>(), Ok(Category::Markets));
        assert!("market".parse::<Category>().is_err());
        assert!("States".parse::<Category>().is_err());
        assert_eq!(Category::Commodities.attribute(), Attribute::Commodity);
    }

    #[test]
    fn test_single_category_serialization() {
        let store = store();
        let unique = UniqueValuesIndex::compute(&store);

        let value = serde_json::to_value(unique.only(Category::Commodities)).unwrap();
        assert_eq!(value, json!({"commodities": ["Rice", "Banana"]}));
    }

    #[test]
    fn test_full_serialization_keys() {
        let store = DataStore::empty();
        let unique = UniqueValuesIndex::compute(&store);
        let value = serde_json::to_value(&unique).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        for name in Category::names() {
            assert_eq!(value[name], json!([]));
        }
    }
}
