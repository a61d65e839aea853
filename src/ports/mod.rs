//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the checker and an external
//! system (time, the calendar API). Implementations live in `src/adapters/`.
//! Process launching has its own abstraction in [`crate::runner`].

pub mod calendar;
pub mod clock;

pub use calendar::{
    CalendarEntry, CalendarFuture, CalendarSource, Event, EventStart, Page, TimeWindow,
};
pub use clock::Clock;
