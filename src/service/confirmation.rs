use crate::models::event::ExtractedEvent;
use crate::service::import_service::ImportReport;

pub const EXTRACTION_FAILED_MESSAGE: &str = "GPT Error";
pub const NO_DATES_MESSAGE: &str = "No dates found within Syllabus";
pub const EVENTS_CREATED_MESSAGE: &str = "Events Created!";
pub const IMPORT_CHOICE: &str = "Import Dates";
pub const EXIT_CHOICE: &str = "Exit";

const MISSING_FIELD: &str = "TBD";

/// `(Name: Description, START to END)|` for every event, in order.
pub fn render_events_summary(events: &[ExtractedEvent]) -> String {
    let mut summary = String::new();
    for event in events {
        summary.push('(');
        summary.push_str(event.name.as_deref().unwrap_or(MISSING_FIELD));
        summary.push_str(": ");
        if let Some(description) = &event.description {
            summary.push_str(description);
            summary.push_str(", ");
        }
        summary.push_str(event.start_time.as_deref().unwrap_or(MISSING_FIELD));
        summary.push_str(" to ");
        summary.push_str(event.end_time.as_deref().unwrap_or(MISSING_FIELD));
        summary.push_str(")|");
    }
    summary
}

pub fn render_import_result(report: &ImportReport) -> String {
    match &report.failure {
        None => EVENTS_CREATED_MESSAGE.to_string(),
        Some(failure) => format!(
            "Failed to create event: {}. {} event(s) were created before stopping.",
            failure,
            report.succeeded()
        ),
    }
}
