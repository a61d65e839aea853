//! Recording builder that captures invocations as a command script.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use regex::escape;

use super::error::CommandError;
use super::expect::GENERIC_FAILURE;
use super::script::{CommandScript, ScriptedCommand};
use super::{command_line, Builder, Command};

/// Collects recorded commands and writes them as a YAML script.
#[derive(Debug)]
pub struct ScriptRecorder {
    path: PathBuf,
    script: CommandScript,
}

impl ScriptRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), script: CommandScript::default() }
    }

    /// Appends a recorded command.
    pub fn record(&mut self, command: ScriptedCommand) {
        self.script.commands.push(command);
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn script(&self) -> &CommandScript {
        &self.script
    }

    /// Writes the script to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        self.script.save(&self.path)?;
        Ok(self.path)
    }
}

/// Forwards to an inner builder and records what each command did.
pub struct RecordingBuilder {
    inner: Box<dyn Builder>,
    recorder: Arc<Mutex<ScriptRecorder>>,
}

impl RecordingBuilder {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn Builder>, recorder: Arc<Mutex<ScriptRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn wrap(
        &self,
        inner: Box<dyn Command>,
        dir: &Path,
        env: Option<&[String]>,
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command> {
        Box::new(RecordingCommand {
            inner,
            pending: PendingRecord {
                recorder: Arc::clone(&self.recorder),
                path: dir.to_path_buf(),
                command: escape(&command_line(program, args)),
                environment: env.map(<[String]>::to_vec),
            },
        })
    }
}

impl Builder for RecordingBuilder {
    fn command(&self, dir: &Path, program: &str, args: &[&str]) -> Box<dyn Command> {
        let inner = self.inner.command(dir, program, args);
        self.wrap(inner, dir, None, program, args)
    }

    fn command_with_env(
        &self,
        dir: &Path,
        env: &[String],
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command> {
        let inner = self.inner.command_with_env(dir, env, program, args);
        self.wrap(inner, dir, Some(env), program, args)
    }
}

struct RecordingCommand {
    inner: Box<dyn Command>,
    pending: PendingRecord,
}

struct PendingRecord {
    recorder: Arc<Mutex<ScriptRecorder>>,
    path: PathBuf,
    command: String,
    environment: Option<Vec<String>>,
}

impl PendingRecord {
    fn record(self, result: &Result<Vec<u8>, CommandError>) {
        let (output, exit_code) = match result {
            Ok(out) => (String::from_utf8_lossy(out).into_owned(), 0),
            Err(CommandError::Exit { status, output, stderr }) => {
                let text = if stderr.is_empty() { output } else { stderr };
                let code = status.code().unwrap_or(GENERIC_FAILURE);
                (String::from_utf8_lossy(text).into_owned(), code)
            }
            Err(err) => (err.to_string(), GENERIC_FAILURE),
        };
        let scripted = ScriptedCommand {
            path: self.path,
            command: self.command,
            output,
            exit_code,
            environment: self.environment,
        };
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner).record(scripted);
    }
}

impl Command for RecordingCommand {
    fn output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        let Self { inner, pending } = *self;
        let result = inner.output();
        pending.record(&result);
        result
    }

    fn combined_output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        let Self { inner, pending } = *self;
        let result = inner.combined_output();
        pending.record(&result);
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::{ExpectedCommand, TestBuilder};

    #[test]
    fn records_replayed_results() {
        let inner = TestBuilder::new([
            ExpectedCommand::new("", "git status", "clean\n", 0),
            ExpectedCommand::new("/srv", "make", "no rule", 2),
        ]);
        let recorder = Arc::new(Mutex::new(ScriptRecorder::new("unused.yaml")));
        let builder = RecordingBuilder::new(Box::new(inner), Arc::clone(&recorder));

        let out = builder.command(Path::new(""), "git", &["status"]).output().unwrap();
        assert_eq!(out, b"clean\n");
        let err = builder.command(Path::new("/srv"), "make", &[]).output().unwrap_err();
        assert_eq!(err.exit_code(), Some(2));

        let guard = recorder.lock().unwrap();
        let commands = &guard.script().commands;
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].command, "git status");
        assert_eq!(commands[0].output, "clean\n");
        assert_eq!(commands[1].path, PathBuf::from("/srv"));
        assert_eq!((commands[1].output.as_str(), commands[1].exit_code), ("no rule", 2));
    }

    #[test]
    fn escapes_command_lines_for_replay() {
        let recorder = Arc::new(Mutex::new(ScriptRecorder::new("unused.yaml")));
        let builder = RecordingBuilder::new(
            Box::new(TestBuilder::new([ExpectedCommand::new("", "xdg-open .*", "", 0)])),
            Arc::clone(&recorder),
        );
        let _ = builder.command(Path::new(""), "xdg-open", &["https://a.test/?x=1"]).output();

        let script = recorder.lock().unwrap().script().clone();
        assert!(script.commands[0].command.contains(r"a\.test/\?x=1"));

        let replay = script.into_builder();
        let _ = replay.command(Path::new(""), "xdg-open", &["https://a.test/?x=1"]).output();
        assert!(replay.errors().is_empty());
    }

    #[test]
    fn records_generic_failures() {
        let recorder = Arc::new(Mutex::new(ScriptRecorder::new("unused.yaml")));
        let builder =
            RecordingBuilder::new(Box::new(TestBuilder::default()), Arc::clone(&recorder));
        let _ = builder.command(Path::new(""), "ls", &[]).combined_output();

        let guard = recorder.lock().unwrap();
        assert_eq!(guard.script().commands[0].exit_code, GENERIC_FAILURE);
        assert_eq!(guard.script().commands[0].output, "Error running command");
    }

    #[test]
    fn finish_writes_yaml() {
        let dir = std::env::temp_dir().join("calcheck_recording_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("recorded.yaml");

        let mut recorder = ScriptRecorder::new(&path);
        recorder.record(ScriptedCommand {
            path: PathBuf::new(),
            command: "ls".into(),
            output: "a\n".into(),
            exit_code: 0,
            environment: None,
        });
        assert_eq!(recorder.finish().unwrap(), path);

        let loaded = CommandScript::load(&path).unwrap();
        assert_eq!(loaded.commands[0].command, "ls");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
