//! Output capture shared by real and replayed commands.

use std::io::{self, Read};
use std::process::{Command, Stdio};

use super::error::CommandError;

/// Runs `command` and returns its standard output.
pub(crate) fn output(mut command: Command, program: &str) -> Result<Vec<u8>, CommandError> {
    let out = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| CommandError::Spawn { program: program.to_string(), source })?;
    if out.status.success() {
        return Ok(out.stdout);
    }
    Err(CommandError::Exit { status: out.status, output: out.stdout, stderr: out.stderr })
}

/// Runs `command` with stdout and stderr sharing one pipe.
pub(crate) fn combined_output(
    mut command: Command,
    program: &str,
) -> Result<Vec<u8>, CommandError> {
    let spawn_error = |source| CommandError::Spawn { program: program.to_string(), source };

    let (mut reader, writer) = io::pipe().map_err(spawn_error)?;
    let stderr_writer = writer.try_clone().map_err(spawn_error)?;
    let mut child = command
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer)
        .spawn()
        .map_err(spawn_error)?;
    // The builder holds the parent's copies of the write end; the read below
    // only sees EOF once they are closed.
    drop(command);

    let mut buf = Vec::new();
    let read = reader.read_to_end(&mut buf);
    let status = child.wait()?;
    read?;

    if status.success() {
        return Ok(buf);
    }
    Err(CommandError::Exit { status, output: buf, stderr: Vec::new() })
}
