//! Builder that replays expected commands instead of running them.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::capture;
use super::error::{CommandError, Discrepancy};
use super::expect::{ExpectedCommand, GENERIC_FAILURE};
use super::helper::{HelperProgram, Replay};
use super::{command_line, Builder, Command};

/// Matches invocations against a queue of [`ExpectedCommand`]s.
///
/// Every invocation consumes one entry. Anything unexpected (wrong command,
/// path or environment, or more invocations than entries) is appended to
/// [`errors`](Self::errors) and the invocation still gets a result, so the
/// code under test keeps running. Check `errors()` once it finishes.
///
/// Every invocation is compared with the front entry first. In ordered mode
/// a command that differs from it is a mismatch, but the first entry that
/// does match is the one consumed, so a single swapped pair yields a single
/// mismatch. In any-order mode a match anywhere in the queue is accepted.
/// When nothing matches, the front entry is consumed.
#[derive(Debug, Default)]
pub struct TestBuilder {
    state: Mutex<State>,
    any_order: bool,
    helper: HelperProgram,
}

#[derive(Debug, Default)]
struct State {
    expected: VecDeque<ExpectedCommand>,
    errors: Vec<Discrepancy>,
}

impl TestBuilder {
    /// Creates an ordered builder expecting `expected`.
    pub fn new(expected: impl IntoIterator<Item = ExpectedCommand>) -> Self {
        Self {
            state: Mutex::new(State {
                expected: expected.into_iter().collect(),
                errors: Vec::new(),
            }),
            any_order: false,
            helper: HelperProgram::default(),
        }
    }

    /// Sets whether entries may be consumed out of order.
    #[must_use]
    pub fn with_any_order(mut self, any_order: bool) -> Self {
        self.any_order = any_order;
        self
    }

    /// Replays results through `helper` instead of the default shell script.
    #[must_use]
    pub fn with_helper(mut self, helper: HelperProgram) -> Self {
        self.helper = helper;
        self
    }

    /// Appends another expected invocation.
    pub fn expect(&self, expected: ExpectedCommand) {
        self.lock().expected.push_back(expected);
    }

    /// Discrepancies recorded so far, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<Discrepancy> {
        self.lock().errors.clone()
    }

    /// Commands of the entries that have not been consumed yet.
    #[must_use]
    pub fn remaining_commands(&self) -> Vec<String> {
        self.lock().expected.iter().map(|e| e.command().to_string()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(
        &self,
        dir: &Path,
        env: Option<&[String]>,
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command> {
        let line = command_line(program, args);
        let (replay, generic, closure) = {
            let mut state = self.lock();
            match state.take(&line, self.any_order) {
                Some(mut expected) => {
                    state.validate(&expected, dir, env);
                    let generic = expected.exit_code() == GENERIC_FAILURE;
                    (expected.replay(), generic, expected.take_closure())
                }
                None => {
                    state.errors.push(Discrepancy::ExtraCommand(line.clone()));
                    let failure =
                        Replay { stdout: String::new(), stderr: String::new(), exit_code: 1 };
                    (failure, true, None)
                }
            }
        };

        if let Some(closure) = closure {
            closure(&invocation(dir, &line));
        }

        Box::new(ReplayedCommand { helper: self.helper.clone(), replay, generic })
    }
}

impl State {
    fn take(&mut self, line: &str, any_order: bool) -> Option<ExpectedCommand> {
        let front = self.expected.front()?;
        if front.matches(line) {
            return self.expected.pop_front();
        }

        let found = self.expected.iter().position(|e| e.matches(line));
        if !any_order || found.is_none() {
            self.errors.push(Discrepancy::Command {
                actual: line.to_string(),
                expected: front.command().to_string(),
            });
        }
        match found {
            Some(index) => self.expected.remove(index),
            None => self.expected.pop_front(),
        }
    }

    fn validate(&mut self, expected: &ExpectedCommand, dir: &Path, env: Option<&[String]>) {
        if expected.path() != dir {
            self.errors.push(Discrepancy::Path {
                actual: dir.to_path_buf(),
                expected: expected.path().to_path_buf(),
            });
        }

        if let Some(wanted) = expected.environment() {
            let actual = env.unwrap_or_default();
            if actual != wanted {
                self.errors.push(Discrepancy::Environment {
                    actual: actual.to_vec(),
                    expected: wanted.to_vec(),
                });
            }
        }
    }
}

fn invocation(dir: &Path, line: &str) -> String {
    if dir.as_os_str().is_empty() {
        return line.to_string();
    }
    format!("{} {line}", dir.display())
}

impl Builder for TestBuilder {
    fn command(&self, dir: &Path, program: &str, args: &[&str]) -> Box<dyn Command> {
        self.dispatch(dir, None, program, args)
    }

    fn command_with_env(
        &self,
        dir: &Path,
        env: &[String],
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command> {
        self.dispatch(dir, Some(env), program, args)
    }
}

struct ReplayedCommand {
    helper: HelperProgram,
    replay: Replay,
    generic: bool,
}

impl ReplayedCommand {
    fn finish(&self, result: Result<Vec<u8>, CommandError>) -> Result<Vec<u8>, CommandError> {
        match result {
            Err(CommandError::Exit { .. }) if self.generic => Err(CommandError::Failed),
            other => other,
        }
    }
}

impl Command for ReplayedCommand {
    fn output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        let result = capture::output(self.helper.command(&self.replay), &self.helper.program());
        self.finish(result)
    }

    fn combined_output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        let result =
            capture::combined_output(self.helper.command(&self.replay), &self.helper.program());
        self.finish(result)
    }
}
