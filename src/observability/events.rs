//! Lifecycle and request events emitted by the service
//!
//! Events are explicit and typed; the logger only ever sees their
//! upper-case wire names.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved from defaults, file, environment and flags
    ConfigLoaded,
    /// Listener bound, ready to serve
    Serving,
    /// Server loop exited
    ShutdownComplete,

    // Dataset
    /// Dataset file parsed into the store
    DataLoaded,
    /// Dataset could not be loaded; serving an empty dataset
    DataLoadFailed,
    /// One record in the dataset could not be read and was left out
    RecordSkipped,

    // Requests
    /// A query endpoint produced a result
    QueryServed,
    /// A query was rejected with a client error
    QueryRejected,
    /// A handler panicked and was converted to a 500
    HandlerPanic,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "MANDI_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "MANDI_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::DataLoaded => "DATA_LOADED",
            Event::DataLoadFailed => "DATA_LOAD_FAILED",
            Event::RecordSkipped => "RECORD_SKIPPED",

            Event::QueryServed => "QUERY_SERVED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::HandlerPanic => "HANDLER_PANIC",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> super::Severity {
        use super::Severity;

        match self {
            Event::DataLoadFailed | Event::HandlerPanic => Severity::Error,
            Event::QueryRejected | Event::RecordSkipped => Severity::Warn,
            Event::QueryServed => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
