//! Live adapter for the `CalendarSource` port using the Google Calendar v3 REST API.

use std::error::Error;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::ports::calendar::{
    CalendarEntry, CalendarFuture, CalendarSource, Event, Page, TimeWindow,
};

type BoxError = Box<dyn Error + Send + Sync>;

/// Default API root; overridden with `CALCHECK_API_BASE`.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Live calendar source that calls the Google Calendar API.
pub struct LiveCalendarSource {
    client: Client,
    base: String,
}

impl LiveCalendarSource {
    /// Creates a client for the API rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { client: Client::new(), base: base.into().trim_end_matches('/').to_string() }
    }

    /// Appends `segments` to the API root, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BoxError> {
        let mut url = Url::parse(&self.base).map_err(|e| -> BoxError {
            format!("Invalid Calendar API base {}: {e}", self.base).into()
        })?;
        url.path_segments_mut()
            .map_err(|()| -> BoxError {
                format!("Calendar API base {} cannot take a path", self.base).into()
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BoxError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| -> BoxError { format!("Calendar API request failed: {e}").into() })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| -> BoxError {
            format!("Failed to read Calendar API response: {e}").into()
        })?;

        if !status.is_success() {
            return Err(
                format!("got HTTP response code {} with body: {body}", status.as_u16()).into()
            );
        }

        serde_json::from_str(&body).map_err(|e| -> BoxError {
            format!("Failed to parse Calendar API response: {e}").into()
        })
    }
}

impl Default for LiveCalendarSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl CalendarSource for LiveCalendarSource {
    fn calendars<'a>(
        &'a self,
        token: &'a str,
        page_token: Option<&'a str>,
    ) -> CalendarFuture<'a, Page<CalendarEntry>> {
        Box::pin(async move {
            let mut query = Vec::new();
            if let Some(page) = page_token {
                query.push(("pageToken", page));
            }
            let url = self.endpoint(&["users", "me", "calendarList"])?;
            self.get(url, token, &query).await
        })
    }

    fn events<'a>(
        &'a self,
        token: &'a str,
        calendar_id: &'a str,
        window: &'a TimeWindow,
        page_token: Option<&'a str>,
    ) -> CalendarFuture<'a, Page<Event>> {
        Box::pin(async move {
            let mut query = vec![
                ("singleEvents", "true"),
                ("timeMin", window.min.as_str()),
                ("timeMax", window.max.as_str()),
            ];
            if let Some(page) = page_token {
                query.push(("pageToken", page));
            }
            let url = self.endpoint(&["calendars", calendar_id, "events"])?;
            self.get(url, token, &query).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base() {
        let source = LiveCalendarSource::new("http://localhost:9999/");
        assert_eq!(source.base, "http://localhost:9999");
    }

    #[test]
    fn calendar_ids_stay_one_path_segment() {
        let source = LiveCalendarSource::default();
        let url = source.endpoint(&["calendars", "me@example.com", "events"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/me@example.com/events"
        );

        let url = source.endpoint(&["calendars", "a b/c?d#e", "events"]).unwrap();
        assert_eq!(url.path(), "/calendar/v3/calendars/a%20b%2Fc%3Fd%23e/events");
    }

    #[test]
    fn endpoint_on_bare_host() {
        let source = LiveCalendarSource::new("http://localhost:9999/");
        let url = source.endpoint(&["users", "me", "calendarList"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/users/me/calendarList");
    }

    #[test]
    fn unusable_base_is_an_error() {
        let source = LiveCalendarSource::new("not a url");
        let err = source.endpoint(&["users"]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid Calendar API base not a url"));
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        let source = LiveCalendarSource::new("http://127.0.0.1:9");
        let result = source.calendars("token", None).await;
        assert!(result.unwrap_err().to_string().starts_with("Calendar API request failed"));
    }
}
