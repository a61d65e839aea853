//! YAML command scripts: expectation queues stored on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::expect::ExpectedCommand;
use super::test_builder::TestBuilder;

/// One scripted invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptedCommand {
    /// Working directory; empty for "inherited".
    #[serde(default)]
    pub path: PathBuf,
    /// Command line or anchored pattern.
    pub command: String,
    /// Canned output text.
    #[serde(default)]
    pub output: String,
    /// Canned exit code (`-1` for a status-less failure).
    #[serde(default)]
    pub exit_code: i32,
    /// Exact environment the command must be bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,
}

/// An expectation queue in serializable form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandScript {
    /// Whether commands may arrive in any order.
    #[serde(default)]
    pub any_order: bool,
    /// Expected commands, in order.
    #[serde(default)]
    pub commands: Vec<ScriptedCommand>,
}

impl CommandScript {
    /// Reads a script from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read command script {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse command script {}: {e}", path.display()))
    }

    /// Writes the script as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let yaml = serde_yaml::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(path, yaml)
    }

    /// Builds a [`TestBuilder`] expecting the scripted commands.
    #[must_use]
    pub fn into_builder(self) -> TestBuilder {
        TestBuilder::new(self.commands.into_iter().map(ExpectedCommand::from))
            .with_any_order(self.any_order)
    }
}

impl From<ScriptedCommand> for ExpectedCommand {
    fn from(scripted: ScriptedCommand) -> Self {
        let expected = ExpectedCommand::new(
            scripted.path,
            scripted.command,
            scripted.output,
            scripted.exit_code,
        );
        match scripted.environment {
            Some(environment) => expected.with_environment(environment),
            None => expected,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::{Builder, Discrepancy};

    const SCRIPT: &str = r#"
any_order: true
commands:
  - command: "git status"
    output: "clean\n"
  - path: /srv
    command: "make .*"
    output: "no rule"
    exit_code: 2
    environment: ["CC=clang"]
"#;

    #[test]
    fn parses_defaults() {
        let script: CommandScript = serde_yaml::from_str(SCRIPT).unwrap();
        assert!(script.any_order);
        assert_eq!(script.commands[0].path, PathBuf::new());
        assert_eq!(script.commands[0].exit_code, 0);
        assert_eq!(script.commands[0].environment, None);
        assert_eq!(script.commands[1].environment, Some(vec!["CC=clang".to_string()]));
    }

    #[test]
    fn loaded_script_drives_a_builder() {
        let dir = std::env::temp_dir().join("calcheck_script_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("commands.yaml");
        std::fs::write(&path, SCRIPT).unwrap();

        let builder = CommandScript::load(&path).unwrap().into_builder();
        let err = builder
            .command_with_env(Path::new("/srv"), &["CC=clang".into()], "make", &["all"])
            .output()
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(2));
        let out = builder.command(Path::new(""), "git", &["status"]).output().unwrap();
        assert_eq!(out, b"clean\n");
        assert_eq!(builder.errors(), Vec::<Discrepancy>::new());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CommandScript::load(Path::new("/nonexistent/commands.yaml")).unwrap_err();
        assert!(err.starts_with("Failed to read command script /nonexistent/commands.yaml"));
    }

    #[test]
    fn save_then_load_preserves_script() {
        let dir = std::env::temp_dir().join("calcheck_script_save_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("saved.yaml");

        let script: CommandScript = serde_yaml::from_str(SCRIPT).unwrap();
        script.save(&path).unwrap();
        assert_eq!(CommandScript::load(&path).unwrap(), script);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
