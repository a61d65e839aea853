//! Clock port for obtaining the current time.

use chrono::{DateTime, Local};

/// Provides the current time.
///
/// Abstracting time access lets tests pin "today".
pub trait Clock: Send + Sync {
    /// Returns the current local time.
    fn now(&self) -> DateTime<Local>;
}
