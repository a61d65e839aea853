//! Binary entrypoint for the `calcheck` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // When spawned as a replay helper this writes the canned result and exits.
    calcheck::runner::helper::serve_if_requested();

    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Recording is handled in commands::dispatch via CALCHECK_RECORD=<file>.
    match calcheck::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
