//! Process execution behind a swappable builder.
//!
//! Application code asks a [`Builder`] for a [`Command`] and then captures
//! its output. [`RealBuilder`] launches the requested program. [`TestBuilder`]
//! matches each invocation against a queue of [`ExpectedCommand`]s and
//! replays the canned result through a genuine helper process, so callers
//! see the same [`CommandError`] shapes either way.

mod capture;
pub mod error;
pub mod expect;
pub mod helper;
pub mod real;
pub mod recording;
pub mod script;
pub mod test_builder;

use std::path::Path;

pub use error::{CommandError, Discrepancy};
pub use expect::{ExpectedCommand, GENERIC_FAILURE};
pub use helper::HelperProgram;
pub use real::RealBuilder;
pub use recording::{RecordingBuilder, ScriptRecorder};
pub use script::{CommandScript, ScriptedCommand};
pub use test_builder::TestBuilder;

/// A single bound process invocation.
///
/// Each capturing operation consumes the command; a command runs at most once.
pub trait Command: Send {
    /// Runs the command and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Exit`] when the process exits unsuccessfully,
    /// or a spawn/IO error when it cannot be run at all.
    fn output(self: Box<Self>) -> Result<Vec<u8>, CommandError>;

    /// Runs the command and returns standard output and standard error
    /// interleaved in the order the process wrote them.
    ///
    /// # Errors
    ///
    /// Same as [`Command::output`].
    fn combined_output(self: Box<Self>) -> Result<Vec<u8>, CommandError>;
}

/// Creates [`Command`]s.
///
/// An empty `dir` means the child inherits the caller's working directory.
pub trait Builder: Send + Sync {
    /// Binds a command that inherits the ambient environment.
    fn command(&self, dir: &Path, program: &str, args: &[&str]) -> Box<dyn Command>;

    /// Binds a command that runs with exactly `env` (`KEY=VALUE` entries).
    fn command_with_env(
        &self,
        dir: &Path,
        env: &[String],
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command>;
}

/// Joins a program and its arguments the way invocations are displayed and
/// matched.
pub(crate) fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}
