//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `calcheck`.
#[derive(Debug, Parser)]
#[command(name = "calcheck", version, about = "Checks Google Calendar for today's appointments")]
pub struct Cli {
    /// The Google OAuth credential file.
    #[arg(long, visible_alias = "credentialFile", env = "CALCHECK_OAUTH_CREDENTIAL_FILE")]
    pub credential_file: Option<PathBuf>,
    /// The OAuth token file.
    #[arg(long, visible_alias = "tokenFile", env = "CALCHECK_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}
