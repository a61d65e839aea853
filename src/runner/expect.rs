//! Expected invocations and their canned results.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::helper::Replay;

/// Exit code marking an entry that fails without a process status.
pub const GENERIC_FAILURE: i32 = -1;

/// Callback run with the invocation string when an entry is matched.
pub type Closure = Box<dyn FnOnce(&str) + Send>;

/// One invocation a [`TestBuilder`](super::TestBuilder) expects to see.
///
/// `command` is compared with the invocation's command line (program and
/// arguments joined by spaces), first literally and then as a regular
/// expression anchored at both ends, so `xdg-open .*` accepts any URL.
pub struct ExpectedCommand {
    path: PathBuf,
    command: String,
    pattern: Option<Regex>,
    output: String,
    exit_code: i32,
    environment: Option<Vec<String>>,
    closure: Option<Closure>,
}

impl ExpectedCommand {
    /// Expects `command` to run in `path`.
    ///
    /// A zero `exit_code` replays `output` on standard output. Any other code
    /// replays it on standard error and exits with that code, except
    /// [`GENERIC_FAILURE`] which fails with no status at all. Codes outside
    /// `0..=255` wrap modulo 256, as a real exit status would.
    pub fn new(
        path: impl Into<PathBuf>,
        command: impl Into<String>,
        output: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        let command = command.into();
        Self {
            path: path.into(),
            pattern: Regex::new(&format!("^(?:{command})$")).ok(),
            command,
            output: output.into(),
            exit_code,
            environment: None,
            closure: None,
        }
    }

    /// Also requires the command to be bound to exactly this environment.
    #[must_use]
    pub fn with_environment<I, S>(mut self, environment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environment = Some(environment.into_iter().map(Into::into).collect());
        self
    }

    /// Runs `closure` with the invocation string when this entry is matched.
    #[must_use]
    pub fn with_closure(mut self, closure: impl FnOnce(&str) + Send + 'static) -> Self {
        self.closure = Some(Box::new(closure));
        self
    }

    /// Expected working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Expected command line or pattern.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Canned output text.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Canned exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Expected environment, if any.
    #[must_use]
    pub fn environment(&self) -> Option<&[String]> {
        self.environment.as_deref()
    }

    pub(crate) fn matches(&self, command_line: &str) -> bool {
        self.command == command_line
            || self.pattern.as_ref().is_some_and(|pattern| pattern.is_match(command_line))
    }

    pub(crate) fn take_closure(&mut self) -> Option<Closure> {
        self.closure.take()
    }

    pub(crate) fn replay(&self) -> Replay {
        let (stdout, stderr) = match self.exit_code {
            0 => (self.output.clone(), String::new()),
            _ => (String::new(), self.output.clone()),
        };
        let exit_code = match self.exit_code {
            GENERIC_FAILURE => 1,
            code => code.rem_euclid(256),
        };
        Replay { stdout, stderr, exit_code }
    }
}

impl fmt::Debug for ExpectedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedCommand")
            .field("path", &self.path)
            .field("command", &self.command)
            .field("output", &self.output)
            .field("exit_code", &self.exit_code)
            .field("environment", &self.environment)
            .field("closure", &self.closure.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_literally_and_by_pattern() {
        let literal = ExpectedCommand::new("", "ls", "", 0);
        assert!(literal.matches("ls"));
        assert!(!literal.matches("ls -la"));
        assert!(!literal.matches("als"));

        let pattern = ExpectedCommand::new("", "xdg-open .*", "", 0);
        assert!(pattern.matches("xdg-open https://example.com/?a=b"));
        assert!(!pattern.matches("open https://example.com"));
    }

    #[test]
    fn invalid_pattern_only_matches_itself() {
        let expected = ExpectedCommand::new("", "echo (", "", 0);
        assert!(expected.matches("echo ("));
        assert!(!expected.matches("echo"));
    }

    #[test]
    fn replay_routes_output_by_exit_code() {
        let ok = ExpectedCommand::new("", "ls", "a\nb\n", 0).replay();
        assert_eq!((ok.stdout.as_str(), ok.stderr.as_str(), ok.exit_code), ("a\nb\n", "", 0));

        let failed = ExpectedCommand::new("", "ls", "boom", 12).replay();
        assert_eq!(
            (failed.stdout.as_str(), failed.stderr.as_str(), failed.exit_code),
            ("", "boom", 12)
        );

        let generic = ExpectedCommand::new("", "ls", "boom", GENERIC_FAILURE).replay();
        assert_eq!((generic.stderr.as_str(), generic.exit_code), ("boom", 1));
    }

    #[test]
    fn replay_wraps_out_of_range_codes() {
        assert_eq!(ExpectedCommand::new("", "ls", "boom", -2).replay().exit_code, 254);
        assert_eq!(ExpectedCommand::new("", "ls", "boom", 256).replay().exit_code, 0);
        assert_eq!(ExpectedCommand::new("", "ls", "boom", 300).replay().exit_code, 44);
        let wrapped = ExpectedCommand::new("", "ls", "boom", 256).replay();
        assert_eq!(wrapped.stderr, "boom");
    }

    #[test]
    fn debug_hides_closure_body() {
        let expected = ExpectedCommand::new("/tmp", "ls", "", 0).with_closure(|_| {});
        let debug = format!("{expected:?}");
        assert!(debug.contains("closure: true"));
    }
}
