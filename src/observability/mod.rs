//! Observability for bookshelf
//!
//! Structured JSON-line logging with typed event names.
//!
//! ```ignore
//! use bookshelf::observability::{Event, Logger};
//!
//! Logger::info(Event::BookCreated, &[("id", &book.id.to_string())]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at INFO, or FATAL for fatal events
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(lifecycle_severity(event), event, fields);
}

fn lifecycle_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_severity() {
        assert_eq!(lifecycle_severity(Event::BootStart), Severity::Info);
        assert_eq!(lifecycle_severity(Event::StoreClosed), Severity::Info);
        assert_eq!(lifecycle_severity(Event::BootFailed), Severity::Fatal);
    }
}
