//! # Response Formatting
//!
//! JSON bodies returned by the query endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::Record;
use crate::query::{Category, UniqueValues};

/// Filtered records with their count
#[derive(Debug, Clone, Serialize)]
pub struct RecordList<'a> {
    pub total: usize,
    pub records: Vec<&'a Record>,
}

impl<'a> RecordList<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self {
            total: records.len(),
            records,
        }
    }
}

/// Every category of distinct values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueListing<'a> {
    pub available_types: Vec<&'static str>,
    pub data: UniqueValues<'a>,
}

impl<'a> UniqueListing<'a> {
    pub fn new(data: UniqueValues<'a>) -> Self {
        Self {
            available_types: Category::names(),
            data,
        }
    }
}

/// Service metadata served at `/`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub message: &'static str,
    pub endpoints: Vec<&'static str>,
    /// Number of records loaded
    pub records: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
