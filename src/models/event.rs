use serde::{Deserialize, Serialize};

/// One candidate calendar entry as the language model returned it.
///
/// Field names on the wire follow the extraction prompt (`event_Name`,
/// `event_Description`, `start_time`, `end_time`). `null` and missing fields
/// both deserialize to `None`, the name included; an unnamed event is only
/// rejected when it is imported.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExtractedEvent {
    #[serde(rename = "event_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "event_Description", alias = "description", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Start or end of a calendar event as the provider expects it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Body of a calendar event-creation request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CalendarEventPayload {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// What the provider handed back for an event it created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CreatedEvent {
    pub summary: String,
    pub id: Option<String>,
    pub html_link: Option<String>,
}
