//! OAuth client configuration and the browser hand-off.
//!
//! Exchanging the authorization code and storing the resulting token are
//! left to the user; this module only reads an existing token and, when
//! there is none, sends the user to the consent page.

use std::io::{self, Write};
use std::path::Path;

use reqwest::Url;
use serde::Deserialize;
use uuid::Uuid;

use crate::runner::Builder;

/// Read-only access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Redirect used when the credential file lists none.
const OUT_OF_BAND_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

#[cfg(target_os = "macos")]
const BROWSER_COMMAND: &str = "open";
#[cfg(not(target_os = "macos"))]
const BROWSER_COMMAND: &str = "xdg-open";

/// An installed-application OAuth client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// Authorization endpoint.
    pub auth_uri: String,
    /// Token endpoint.
    pub token_uri: String,
}

#[derive(Deserialize)]
struct CredentialFile {
    installed: ClientSecret,
}

/// A previously obtained OAuth token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    /// Bearer token sent to the API.
    pub access_token: String,
}

/// Reads the OAuth client from a Google credential file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a credential file.
pub fn load_credentials(path: &Path) -> Result<ClientSecret, String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        format!("Unable to read app credential file: open {}: {e}", path.display())
    })?;
    let file: CredentialFile = serde_json::from_str(&content)
        .map_err(|e| format!("Unable to parse client secret file to config: {e}"))?;
    Ok(file.installed)
}

/// Reads a token file, returning `None` when it does not exist yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_token(path: &Path) -> Result<Option<Token>, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("Unable to read token file {}: {e}", path.display())),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| format!("Unable to parse token file {}: {e}", path.display()))
}

/// A fresh anti-forgery `state` value.
#[must_use]
pub fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Builds the consent page URL for an offline-access authorization.
///
/// # Errors
///
/// Returns an error if the credential file's `auth_uri` is not a URL.
pub fn consent_url(secret: &ClientSecret, state: &str) -> Result<String, String> {
    let redirect = secret.redirect_uris.first().map_or(OUT_OF_BAND_REDIRECT, String::as_str);
    let url = Url::parse_with_params(
        &secret.auth_uri,
        [
            ("access_type", "offline"),
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect),
            ("response_type", "code"),
            ("scope", CALENDAR_SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| format!("Invalid auth_uri {:?}: {e}", secret.auth_uri))?;
    Ok(url.into())
}

/// Tells the user about `url` and asks the desktop to open it.
///
/// # Errors
///
/// Returns an error if writing the notice fails or the browser command fails.
pub fn open_browser(builder: &dyn Builder, url: &str, out: &mut dyn Write) -> Result<(), String> {
    writeln!(out, "Attempting to open {url} in your browser").map_err(|e| e.to_string())?;
    tracing::debug!(command = BROWSER_COMMAND, "launching browser");
    builder
        .command(Path::new(""), BROWSER_COMMAND, &[url])
        .combined_output()
        .map(|_| ())
        .map_err(|e| format!("Unable to open browser: {e}"))
}
