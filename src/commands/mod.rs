//! Command dispatch and handlers.

pub mod check;

use std::env;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::runner::ScriptRecorder;

/// Dispatch parsed arguments to the check.
///
/// When `CALCHECK_RECORD` is set to a file path, every launched command is
/// recorded into a command script at that path.
///
/// # Errors
///
/// Returns an error string if the check fails or the recording cannot be written.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let (ctx, recorder) = if let Ok(path) = env::var("CALCHECK_RECORD") {
        let (ctx, recorder) = ServiceContext::recording(path);
        (ctx, Some(recorder))
    } else {
        (ServiceContext::live(), None)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let mut stdout = io::stdout().lock();
    let result = runtime.block_on(check::run(&ctx, cli, &mut stdout));

    // Finish recording after the check completes (even on error)
    if let Some(recorder) = recorder {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(recorder)?;
    }

    result
}

/// Write the recorded command script and report where it went.
fn finish_recording(recorder: Arc<Mutex<ScriptRecorder>>) -> Result<(), String> {
    let recorder = Arc::try_unwrap(recorder)
        .map_err(|_| "Command recorder is still in use".to_string())?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    let path = recorder.finish().map_err(|e| format!("Failed to write command script: {e}"))?;
    eprintln!("Recording saved to: {}", path.display());
    Ok(())
}
