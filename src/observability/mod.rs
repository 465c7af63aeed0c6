//! Observability for querify
//!
//! Structured JSON line logging with typed events. Logging is read-only:
//! it never changes what a predicate returns.
//!
//! ```ignore
//! use querify::observability::{Logger, Severity, Event, log_event};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event(Event::QueryCompiled, Severity::Trace, &[("fields", "2")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event with fields
pub fn log_event(event: Event, severity: Severity, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::OperatorDefined, Severity::Trace, &[("operator", "$gt")]);
        log_event(Event::FilterComplete, Severity::Info, &[]);
    }
}
