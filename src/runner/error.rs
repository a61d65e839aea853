//! Error types for command execution and expectation matching.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Message carried by [`CommandError::Failed`].
pub const GENERIC_FAILURE_MESSAGE: &str = "Error running command";

/// Failure of a [`Command`](super::Command) capturing operation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Reading the child's output or waiting on it failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The process ran and exited unsuccessfully.
    #[error("{status}")]
    Exit {
        /// Real wait status of the child.
        status: ExitStatus,
        /// Output captured before the failure was reported.
        output: Vec<u8>,
        /// Standard error, when it was captured separately.
        stderr: Vec<u8>,
    },
    /// A status-less failure.
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    Failed,
}

impl CommandError {
    /// The child's exit status, if the process ran to completion.
    #[must_use]
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            Self::Exit { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The child's numeric exit code, if it exited normally.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_status().and_then(|status| status.code())
    }
}

/// Something a [`TestBuilder`](super::TestBuilder) saw that the test did
/// not expect. Recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Discrepancy {
    /// The invocation did not match the entry it was evaluated against.
    #[error("Command '{actual}' did not match expected command '{expected}'")]
    Command {
        /// Command line that was run.
        actual: String,
        /// Pattern of the matched entry.
        expected: String,
    },
    /// The working directory differed.
    #[error("Path {} did not match expected path {}", .actual.display(), .expected.display())]
    Path {
        /// Directory the command was bound to.
        actual: PathBuf,
        /// Directory the entry expected.
        expected: PathBuf,
    },
    /// The explicit environment differed.
    #[error(
        "Environment [{}] did not match expected environment [{}]",
        .actual.join(" "),
        .expected.join(" ")
    )]
    Environment {
        /// Environment the command was bound to.
        actual: Vec<String>,
        /// Environment the entry expected.
        expected: Vec<String>,
    },
    /// An invocation arrived after the queue was empty.
    #[error("More commands were run than expected. Extra command: {0}")]
    ExtraCommand(String),
}
