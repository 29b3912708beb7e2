use thiserror::Error;

use crate::models::event::ExtractedEvent;
use crate::service::extraction_service::{ExtractionError, ExtractionOutcome};

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("reply is not a JSON array of events: {0}")]
    Json(#[from] serde_json::Error),
}

/// Drops a leading ```` ```json ```` and a trailing ```` ``` ````, nothing else.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix(JSON_FENCE_OPEN) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE_CLOSE) {
        text = rest;
    }
    text.trim()
}

pub fn parse_events(reply: &str) -> Result<Vec<ExtractedEvent>, SchemaError> {
    Ok(serde_json::from_str(strip_code_fence(reply))?)
}

/// Classifies a raw model reply. Names and timestamps are not looked at here.
pub fn normalize(raw_reply: &str) -> ExtractionOutcome {
    match parse_events(raw_reply) {
        Ok(events) if events.is_empty() => ExtractionOutcome::Empty,
        Ok(events) => ExtractionOutcome::Events(events),
        Err(err) => ExtractionOutcome::Failure(ExtractionError::Schema(err)),
    }
}
