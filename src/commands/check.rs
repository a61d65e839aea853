//! The calendar check: authorize, fetch today's events, print them.

use std::io::Write;
use std::path::Path;

use crate::agenda;
use crate::auth;
use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::ports::calendar::{CalendarSource, TimeWindow};

/// Execute the check.
///
/// Without a token, the consent page is opened in the browser and the check
/// stops with an error telling the user where the token belongs.
///
/// # Errors
///
/// Returns an error string if a flag is missing, the credential or token
/// file is unusable, or the Calendar API fails.
pub async fn run(ctx: &ServiceContext, cli: &Cli, out: &mut dyn Write) -> Result<(), String> {
    let credential_file =
        non_empty(cli.credential_file.as_deref()).ok_or("You must specify a credentialFile")?;
    let token_file = non_empty(cli.token_file.as_deref()).ok_or("You must specify a tokenFile")?;

    let secret = auth::load_credentials(credential_file)
        .map_err(|e| format!("Could not initialize token client: {e}"))?;
    let token =
        auth::load_token(token_file).map_err(|e| format!("Could not get OAuth token: {e}"))?;
    let Some(token) = token else {
        let url = auth::consent_url(&secret, &auth::new_state())?;
        auth::open_browser(ctx.commands.as_ref(), &url, out)?;
        return Err(format!(
            "Could not get OAuth token: no token in {}; authorize in the browser and save the token there",
            token_file.display()
        ));
    };

    let window = agenda::today(&ctx.clock.now());
    print_primary_events(ctx.calendar.as_ref(), &token.access_token, &window, out).await
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Prints today's events of every primary calendar, following pagination.
async fn print_primary_events(
    source: &dyn CalendarSource,
    token: &str,
    window: &TimeWindow,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut page_token: Option<String> = None;
    loop {
        let page = source.calendars(token, page_token.as_deref()).await.map_err(check_failed)?;
        tracing::debug!(calendars = page.items.len(), "fetched calendar list page");
        for calendar in page.items.iter().filter(|c| c.primary) {
            print_calendar_events(source, token, &calendar.id, window, out).await?;
        }
        page_token = page.next_page_token.filter(|t| !t.is_empty());
        if page_token.is_none() {
            return Ok(());
        }
    }
}

/// Each page of events is printed as its own aligned block.
async fn print_calendar_events(
    source: &dyn CalendarSource,
    token: &str,
    calendar_id: &str,
    window: &TimeWindow,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut page_token: Option<String> = None;
    loop {
        let page = source
            .events(token, calendar_id, window, page_token.as_deref())
            .await
            .map_err(check_failed)?;
        tracing::debug!(count = page.items.len(), "fetched events page");
        agenda::write(out, &page.items)?;
        page_token = page.next_page_token.filter(|t| !t.is_empty());
        if page_token.is_none() {
            return Ok(());
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn check_failed(e: Box<dyn std::error::Error + Send + Sync>) -> String {
    format!("Unable to check calendar. {e}")
}
