use tracing::info;

use crate::models::event::ExtractedEvent;
use crate::models::session::AuthSession;
use crate::service::confirmation::render_events_summary;
use crate::service::extraction_service::{ExtractionError, ExtractionOutcome, ExtractionService};
use crate::service::import_service::{ImportReport, ImportService};

/// Extracted events waiting for the user to pick "Import Dates" or "Exit".
#[derive(Debug, Clone)]
pub struct PendingBatch {
    events: Vec<ExtractedEvent>,
    summary: String,
}

impl PendingBatch {
    fn new(events: Vec<ExtractedEvent>) -> Self {
        let summary = render_events_summary(&events);
        Self { events, summary }
    }

    pub fn events(&self) -> &[ExtractedEvent] {
        &self.events
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn confirm(self) -> ConfirmedBatch {
        ConfirmedBatch {
            events: self.events,
        }
    }

    pub fn into_events(self) -> Vec<ExtractedEvent> {
        self.events
    }
}

/// Events the user agreed to import in one go.
#[derive(Debug, Clone)]
pub struct ConfirmedBatch {
    events: Vec<ExtractedEvent>,
}

impl ConfirmedBatch {
    pub fn from_events(events: Vec<ExtractedEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[ExtractedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug)]
pub enum SubmitDecision {
    AwaitConfirmation(PendingBatch),
    NoEvents,
    Failed(ExtractionError),
}

impl From<ExtractionOutcome> for SubmitDecision {
    fn from(outcome: ExtractionOutcome) -> Self {
        match outcome {
            ExtractionOutcome::Events(events) => SubmitDecision::AwaitConfirmation(PendingBatch::new(events)),
            ExtractionOutcome::Empty => SubmitDecision::NoEvents,
            ExtractionOutcome::Failure(err) => SubmitDecision::Failed(err),
        }
    }
}

pub struct SyllabusFlow {
    extraction: ExtractionService,
    import: ImportService,
}

impl SyllabusFlow {
    pub fn new(extraction: ExtractionService, import: ImportService) -> Self {
        Self { extraction, import }
    }

    pub async fn submit(&self, syllabus_text: &str) -> SubmitDecision {
        self.extraction.extract(syllabus_text).await.into()
    }

    pub async fn import(&self, batch: ConfirmedBatch, session: &AuthSession) -> ImportReport {
        if batch.is_empty() {
            info!(user = ?session.email, "nothing to import");
            return ImportReport::default();
        }
        info!(count = batch.len(), user = ?session.email, "import confirmed");
        self.import.import_all(batch.events(), session).await
    }
}
