//! # Price Records
//!
//! A record is one price observation tying a state, district, market and
//! commodity to a min/max/modal price. Records are read once and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::QueryError;

/// A single mandi price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub district: String,

    #[serde(default)]
    pub market: String,

    #[serde(default)]
    pub commodity: String,

    #[serde(deserialize_with = "price")]
    pub min_price: f64,

    #[serde(deserialize_with = "price")]
    pub max_price: f64,

    #[serde(deserialize_with = "price")]
    pub modal_price: f64,

    /// Fields the service does not interpret (variety, grade, arrival_date, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Create a record with no pass-through fields
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        market: impl Into<String>,
        commodity: impl Into<String>,
        min_price: f64,
        max_price: f64,
        modal_price: f64,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            market: market.into(),
            commodity: commodity.into(),
            min_price,
            max_price,
            modal_price,
            extra: Map::new(),
        }
    }

    /// Value of one of the four filterable attributes
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::State => &self.state,
            Attribute::District => &self.district,
            Attribute::Commodity => &self.commodity,
            Attribute::Market => &self.market,
        }
    }
}

/// Prices arrive either as JSON numbers or as numeric strings.
fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => Ok(n),
        RawPrice::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid price: {:?}", s))),
    }
}

/// The closed set of attributes a record can be filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    State,
    District,
    Commodity,
    Market,
}

impl Attribute {
    /// All filterable attributes, in the order they are advertised to clients
    pub const ALL: [Attribute; 4] = [
        Attribute::State,
        Attribute::District,
        Attribute::Commodity,
        Attribute::Market,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::State => "state",
            Attribute::District => "district",
            Attribute::Commodity => "commodity",
            Attribute::Market => "market",
        }
    }

    /// Names accepted as filter types
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Attribute::as_str).collect()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = QueryError;

    /// Type names are matched case-sensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state" => Ok(Attribute::State),
            "district" => Ok(Attribute::District),
            "commodity" => Ok(Attribute::Commodity),
            "market" => Ok(Attribute::Market),
            other => Err(QueryError::InvalidType(other.to_string())),
        }
    }
}
