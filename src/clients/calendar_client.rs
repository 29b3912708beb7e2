//! Google Calendar v3 REST client.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::event::{CalendarEventPayload, CreatedEvent};

pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("calendar returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse calendar response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    id: Option<String>,
    html_link: Option<String>,
}

pub fn primary_events_url(api_url: &str) -> String {
    format!("{}/calendars/primary/events", api_url.trim_end_matches('/'))
}

/// Creates one event on the authenticated user's primary calendar.
pub async fn insert_event(
    api_url: &str,
    access_token: &str,
    payload: &CalendarEventPayload,
) -> Result<CreatedEvent, CalendarError> {
    let url = primary_events_url(api_url);
    debug!(url = %url, summary = %payload.summary, "posting calendar event");

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .bearer_auth(access_token)
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), summary = %payload.summary, "calendar rejected event");
        return Err(CalendarError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    let created: InsertEventResponse = serde_json::from_str(&text)?;
    Ok(CreatedEvent {
        summary: payload.summary.clone(),
        id: created.id,
        html_link: created.html_link,
    })
}
