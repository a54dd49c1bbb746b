//! # Mandi Price Dataset
//!
//! Record types and the immutable, process-wide store they are loaded into.

mod errors;
mod record;
mod store;

pub use errors::{DataError, DataResult};
pub use record::{Attribute, Record};
pub use store::{DataStore, DEFAULT_DATA_FILE};
