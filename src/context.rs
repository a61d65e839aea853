//! Service context bundling the process builder and port trait objects.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::adapters::live::calendar::{LiveCalendarSource, DEFAULT_API_BASE};
use crate::adapters::live::clock::LiveClock;
use crate::ports::calendar::CalendarSource;
use crate::ports::clock::Clock;
use crate::runner::{Builder, RealBuilder, RecordingBuilder, ScriptRecorder};

/// Bundles everything the checker talks to.
///
/// Constructors wire up live implementations; tests build the struct
/// directly with a `TestBuilder` and fake ports.
pub struct ServiceContext {
    /// Launches external programs (the browser).
    pub commands: Arc<dyn Builder>,
    /// Clock deciding what "today" is.
    pub clock: Box<dyn Clock>,
    /// Calendar API.
    pub calendar: Box<dyn CalendarSource>,
}

impl ServiceContext {
    /// Creates a live context.
    ///
    /// `CALCHECK_API_BASE` overrides the Calendar API root.
    #[must_use]
    pub fn live() -> Self {
        Self::with_commands(Arc::new(RealBuilder))
    }

    /// Creates a live context whose launched commands are recorded into a
    /// command script at `path`.
    ///
    /// The script is written when the returned recorder is finished.
    #[must_use]
    pub fn recording(path: impl Into<PathBuf>) -> (Self, Arc<Mutex<ScriptRecorder>>) {
        let recorder = Arc::new(Mutex::new(ScriptRecorder::new(path)));
        let builder = RecordingBuilder::new(Box::new(RealBuilder), Arc::clone(&recorder));
        (Self::with_commands(Arc::new(builder)), recorder)
    }

    fn with_commands(commands: Arc<dyn Builder>) -> Self {
        let base = std::env::var("CALCHECK_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self {
            commands,
            clock: Box::new(LiveClock),
            calendar: Box::new(LiveCalendarSource::new(base)),
        }
    }
}
