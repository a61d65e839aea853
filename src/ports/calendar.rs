//! Calendar source port for listing calendars and events.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

/// Boxed future type alias used by [`CalendarSource`] to keep the trait dyn-compatible.
pub type CalendarFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Token for the next page, absent on the last one.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// An entry of the user's calendar list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarEntry {
    /// Calendar identifier.
    pub id: String,
    /// Whether this is the user's primary calendar.
    #[serde(default)]
    pub primary: bool,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Event title.
    #[serde(default)]
    pub summary: String,
    /// Start of the event.
    #[serde(default)]
    pub start: EventStart,
}

/// When an event starts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    /// RFC 3339 timestamp; absent for all-day events.
    #[serde(default)]
    pub date_time: Option<String>,
}

/// A half-open time window, as RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub min: String,
    /// Exclusive upper bound.
    pub max: String,
}

/// Reads calendars and events on behalf of an authorized user.
pub trait CalendarSource: Send + Sync {
    /// Fetches one page of the calendar list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn calendars<'a>(
        &'a self,
        token: &'a str,
        page_token: Option<&'a str>,
    ) -> CalendarFuture<'a, Page<CalendarEntry>>;

    /// Fetches one page of single (expanded) events of `calendar_id` within `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn events<'a>(
        &'a self,
        token: &'a str,
        calendar_id: &'a str,
        window: &'a TimeWindow,
        page_token: Option<&'a str>,
    ) -> CalendarFuture<'a, Page<Event>>;
}
