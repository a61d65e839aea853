//! Helper-process replay.
//!
//! A replayed command runs a helper instead of the requested program. The
//! canned streams and exit code travel to the helper in environment
//! variables; the helper writes them back and exits, so the parent captures
//! real pipes and a real wait status.
//!
//! Any executable that calls [`serve_if_requested`] before doing anything
//! else can act as the helper. The `calcheck` binary does, which lets tests
//! re-invoke the crate's own executable. Without one, a POSIX shell script
//! reads the same variables.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{self, Command};

/// Set to `1` in a helper's environment.
pub const HELPER_FLAG_ENV: &str = "CALCHECK_RUNNER_HELPER";
/// Bytes the helper writes to standard output.
pub const STDOUT_ENV: &str = "CALCHECK_RUNNER_STDOUT";
/// Bytes the helper writes to standard error.
pub const STDERR_ENV: &str = "CALCHECK_RUNNER_STDERR";
/// Status the helper exits with.
pub const EXIT_CODE_ENV: &str = "CALCHECK_RUNNER_EXIT_CODE";

const SHELL_SCRIPT: &str = concat!(
    r#"printf '%s' "$CALCHECK_RUNNER_STDOUT"; "#,
    r#"printf '%s' "$CALCHECK_RUNNER_STDERR" >&2; "#,
    r#"exit "$CALCHECK_RUNNER_EXIT_CODE""#,
);

/// What a helper should print and how it should exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replay {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// The executable spawned to replay a canned result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HelperProgram {
    /// `sh -c` with a fixed script.
    #[default]
    Shell,
    /// An executable that calls [`serve_if_requested`] at startup.
    Executable(PathBuf),
}

impl HelperProgram {
    /// Name used in spawn errors.
    pub(crate) fn program(&self) -> String {
        match self {
            Self::Shell => "sh".to_string(),
            Self::Executable(path) => path.display().to_string(),
        }
    }

    pub(crate) fn command(&self, replay: &Replay) -> Command {
        let mut command = match self {
            Self::Shell => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(SHELL_SCRIPT);
                command
            }
            Self::Executable(path) => Command::new(path),
        };
        command
            .env(HELPER_FLAG_ENV, "1")
            .env(STDOUT_ENV, &replay.stdout)
            .env(STDERR_ENV, &replay.stderr)
            .env(EXIT_CODE_ENV, replay.exit_code.to_string());
        command
    }
}

/// Acts as a helper process when the helper flag is set, never returning.
/// Does nothing otherwise.
pub fn serve_if_requested() {
    if env::var_os(HELPER_FLAG_ENV).is_some_and(|flag| flag == "1") {
        process::exit(serve());
    }
}

fn serve() -> i32 {
    let Some(code) = env::var(EXIT_CODE_ENV).ok().and_then(|code| code.parse::<i32>().ok()) else {
        eprintln!("{EXIT_CODE_ENV} is missing or not an integer");
        return 2;
    };
    let stdout = env::var_os(STDOUT_ENV).unwrap_or_default();
    let stderr = env::var_os(STDERR_ENV).unwrap_or_default();

    if write_all(&mut io::stdout(), &stdout).is_err()
        || write_all(&mut io::stderr(), &stderr).is_err()
    {
        return 2;
    }
    code
}

fn write_all(stream: &mut impl Write, text: &OsString) -> io::Result<()> {
    stream.write_all(text.to_string_lossy().as_bytes())?;
    stream.flush()
}
