//! Builder that launches real OS processes.

use std::path::{Path, PathBuf};

use super::capture;
use super::error::CommandError;
use super::{Builder, Command};

/// Launches the requested program with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealBuilder;

impl Builder for RealBuilder {
    fn command(&self, dir: &Path, program: &str, args: &[&str]) -> Box<dyn Command> {
        Box::new(RealCommand::new(dir, None, program, args))
    }

    fn command_with_env(
        &self,
        dir: &Path,
        env: &[String],
        program: &str,
        args: &[&str],
    ) -> Box<dyn Command> {
        Box::new(RealCommand::new(dir, Some(env), program, args))
    }
}

struct RealCommand {
    dir: PathBuf,
    env: Option<Vec<String>>,
    program: String,
    args: Vec<String>,
}

impl RealCommand {
    fn new(dir: &Path, env: Option<&[String]>, program: &str, args: &[&str]) -> Self {
        Self {
            dir: dir.to_path_buf(),
            env: env.map(<[String]>::to_vec),
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    fn build(&self) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args);
        if !self.dir.as_os_str().is_empty() {
            command.current_dir(&self.dir);
        }
        if let Some(env) = &self.env {
            command.env_clear();
            for entry in env {
                // Entries without '=' set the variable to an empty value.
                let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
                command.env(key, value);
            }
        }
        command
    }
}

impl Command for RealCommand {
    fn output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        capture::output(self.build(), &self.program)
    }

    fn combined_output(self: Box<Self>) -> Result<Vec<u8>, CommandError> {
        capture::combined_output(self.build(), &self.program)
    }
}
