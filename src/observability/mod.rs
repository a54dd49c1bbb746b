//! Observability for the mandi price service
//!
//! Structured JSON logging of typed lifecycle and request events.
//!
//! ```ignore
//! use mandi_api::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::DataLoaded, &[("records", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Only verifies no panic
        log_event(Event::BootStart);
        log_event_with_fields(Event::DataLoaded, &[("records", "0")]);
    }
}
