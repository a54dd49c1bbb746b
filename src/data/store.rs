//! # Data Store
//!
//! Holds the dataset loaded once at startup. The store is never written
//! after construction, so it is shared between handlers behind an `Arc`
//! without any locking.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::errors::{DataError, DataResult};
use super::record::Record;
use crate::observability::{log_event_with_fields, Event};

/// File name looked up next to the executable when no path is configured
pub const DEFAULT_DATA_FILE: &str = "mandi_prices.json";

/// Pull the record entries out of a parsed dataset file.
///
/// Accepts the data.gov.in envelope `{ "records": [...] }` (other top-level
/// keys are ignored) or a bare array.
fn record_entries(file: Value, path: &Path) -> DataResult<Vec<Value>> {
    match file {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut envelope) => match envelope.remove("records") {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(DataError::Shape {
                path: path.to_path_buf(),
            }),
        },
        _ => Err(DataError::Shape {
            path: path.to_path_buf(),
        }),
    }
}

/// Read each entry on its own; unreadable entries are logged and left out.
fn read_records(entries: Vec<Value>, path: &Path) -> (Vec<Record>, usize) {
    let path_str = path.display().to_string();
    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Record>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                let index = index.to_string();
                let message = e.to_string();
                log_event_with_fields(
                    Event::RecordSkipped,
                    &[
                        ("path", path_str.as_str()),
                        ("index", index.as_str()),
                        ("message", message.as_str()),
                    ],
                );
            }
        }
    }

    (records, skipped)
}

/// Immutable, ordered collection of price records
#[derive(Debug, Clone)]
pub struct DataStore {
    records: Vec<Record>,
    skipped: usize,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl DataStore {
    /// Build a store from records already in memory
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            skipped: 0,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// An empty store
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// Load the dataset, failing if the file is unreadable or malformed.
    ///
    /// Individual records that cannot be read are skipped, not fatal.
    pub fn try_load(path: &Path) -> DataResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file: Value = serde_json::from_str(&raw).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let (records, skipped) = read_records(record_entries(file, path)?, path);

        Ok(Self {
            records,
            skipped,
            source: Some(path.to_path_buf()),
            loaded_at: Utc::now(),
        })
    }

    /// Load the dataset, degrading to an empty store on any error.
    ///
    /// The failure is logged; the service keeps answering with no records.
    pub fn load(path: &Path) -> Self {
        let path_str = path.display().to_string();

        match Self::try_load(path) {
            Ok(store) => {
                let count = store.len().to_string();
                let skipped = store.skipped().to_string();
                log_event_with_fields(
                    Event::DataLoaded,
                    &[
                        ("path", path_str.as_str()),
                        ("records", count.as_str()),
                        ("skipped", skipped.as_str()),
                    ],
                );
                store
            }
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(
                    Event::DataLoadFailed,
                    &[("path", path_str.as_str()), ("message", message.as_str())],
                );
                Self {
                    source: Some(path.to_path_buf()),
                    ..Self::empty()
                }
            }
        }
    }

    /// Default dataset location: `mandi_prices.json` beside the executable
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DATA_FILE)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    /// All records, in load order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of dataset entries left out because they could not be read
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Where the records were read from, if from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_envelope() {
        let file = write_dataset(
            r#"{
                "title": "Current Daily Price of Various Commodities",
                "records": [
                    {"state": "Karnataka", "district": "Bangalore", "market": "A",
                     "commodity": "Rice", "min_price": 10, "max_price": 20, "modal_price": 15},
                    {"state": "Karnataka", "district": "Mysore", "market": "B",
                     "commodity": "Rice", "min_price": "12", "max_price": "18", "modal_price": "14"}
                ]
            }"#,
        );

        let store = DataStore::try_load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].district, "Bangalore");
        assert_eq!(store.records()[1].modal_price, 14.0);
        assert_eq!(store.source(), Some(file.path()));
    }

    #[test]
    fn test_load_bare_array() {
        let file = write_dataset(
            r#"[{"state": "Punjab", "district": "Ludhiana", "market": "Khanna",
                 "commodity": "Wheat", "min_price": 2100, "max_price": 2300, "modal_price": 2200}]"#,
        );

        let store = DataStore::try_load(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].commodity, "Wheat");
    }

    #[test]
    fn test_try_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = DataStore::try_load(&path).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn test_try_load_malformed() {
        let file = write_dataset("{ not json");
        let err = DataStore::try_load(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }

    #[test]
    fn test_try_load_wrong_shape() {
        let file = write_dataset(r#"{"title": "no records here"}"#);
        let err = DataStore::try_load(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Shape { .. }));

        let file = write_dataset("42");
        let err = DataStore::try_load(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Shape { .. }));
    }

    #[test]
    fn test_load_fails_soft() {
        let file = write_dataset("{ not json");

        let store = DataStore::load(file.path());
        assert!(store.is_empty());
        assert_eq!(store.source(), Some(file.path()));
    }

    #[test]
    fn test_bad_record_is_skipped_not_fatal() {
        let file = write_dataset(
            r#"{"records": [
                {"state": "Karnataka", "district": "Bangalore", "market": "A",
                 "commodity": "Rice", "min_price": 10, "max_price": 20, "modal_price": 15},
                {"state": "Goa", "district": "North Goa", "market": "Mapusa",
                 "commodity": "Rice", "min_price": "NA", "max_price": 20, "modal_price": 15},
                {"state": "Goa"},
                {"state": "Karnataka", "district": "Mysore", "market": "B",
                 "commodity": "Rice", "min_price": 12, "max_price": 18, "modal_price": 14}
            ]}"#,
        );

        let store = DataStore::load(file.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.skipped(), 2);
        assert_eq!(store.records()[0].market, "A");
        assert_eq!(store.records()[1].market, "B");
    }

    #[test]
    fn test_default_path_file_name() {
        let path = DataStore::default_path();
        assert_eq!(path.file_name().unwrap(), DEFAULT_DATA_FILE);
    }
}
