//! Observable events
//!
//! Every log line names one of these. Names are stable and upper-snake-case.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    StoreOpened,
    Serving,
    ShutdownStart,
    StoreClosed,
    ShutdownComplete,
    BootFailed,

    // Requests
    RequestComplete,
    RequestRejected,

    // Record mutations
    BookCreated,
    BookReplaced,
    BookDeleted,

    // Store
    StoreFailure,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOKSHELF_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::Serving => "BOOKSHELF_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::StoreClosed => "STORE_CLOSED",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::BootFailed => "BOOKSHELF_STARTUP_FAILED",

            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestRejected => "REQUEST_REJECTED",

            Event::BookCreated => "BOOK_CREATED",
            Event::BookReplaced => "BOOK_REPLACED",
            Event::BookDeleted => "BOOK_DELETED",

            Event::StoreFailure => "STORE_FAILURE",
        }
    }

    /// Returns true if this event means the process cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
