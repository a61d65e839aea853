//! Live adapters for real external interactions.

pub mod calendar;
pub mod clock;
