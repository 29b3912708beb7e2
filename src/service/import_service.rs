use std::sync::Arc;

use chrono_tz::Tz;
use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::calendar_client::CalendarError;
use crate::models::event::{CalendarEventPayload, CreatedEvent, ExtractedEvent};
use crate::models::session::AuthSession;
use crate::service::calendar_service::CalendarClient;
use crate::service::conversion::{self, EventValidationError};

#[derive(Error, Debug)]
pub enum ImportFailure {
    #[error("event {index} ({summary}) is invalid: {error}")]
    Validation {
        index: usize,
        summary: String,
        error: EventValidationError,
    },
    #[error("event {index} ({summary}) could not be created: {error}")]
    Submission {
        index: usize,
        summary: String,
        error: CalendarError,
    },
}

impl ImportFailure {
    pub fn index(&self) -> usize {
        match self {
            ImportFailure::Validation { index, .. } | ImportFailure::Submission { index, .. } => *index,
        }
    }
}

/// Outcome of one batch import.
///
/// Events in `created` exist on the provider even when `failure` is set; they
/// are not rolled back.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub attempted: usize,
    pub created: Vec<CreatedEvent>,
    pub failure: Option<ImportFailure>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn succeeded(&self) -> usize {
        self.created.len()
    }
}

struct Halted {
    report: ImportReport,
    failure: ImportFailure,
}

pub struct ImportService {
    calendar: Arc<dyn CalendarClient>,
    time_zone: Tz,
}

impl ImportService {
    pub fn new(calendar: Arc<dyn CalendarClient>, time_zone: Tz) -> Self {
        Self {
            calendar,
            time_zone,
        }
    }

    /// Converts the whole batch up front; the first invalid event rejects it.
    pub fn prepare_batch(
        events: &[ExtractedEvent],
        time_zone: Tz,
    ) -> Result<Vec<CalendarEventPayload>, ImportFailure> {
        events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                conversion::to_calendar_payload(event, time_zone).map_err(|error| {
                    ImportFailure::Validation {
                        index,
                        summary: event.name.clone().unwrap_or_default(),
                        error,
                    }
                })
            })
            .collect()
    }

    /// Submits `events` one at a time, in order, stopping at the first failure.
    ///
    /// Wall-clock times are read in the session's zone, else the configured one.
    pub async fn import_all(&self, events: &[ExtractedEvent], session: &AuthSession) -> ImportReport {
        let time_zone = session.time_zone.unwrap_or(self.time_zone);
        let payloads = match Self::prepare_batch(events, time_zone) {
            Ok(payloads) => payloads,
            Err(failure) => {
                warn!(error = %failure, "rejecting batch before submission");
                return ImportReport {
                    failure: Some(failure),
                    ..ImportReport::default()
                };
            }
        };

        info!(count = payloads.len(), %time_zone, "importing events");
        let calendar = self.calendar.as_ref();
        let token = session.provider_token.as_str();

        let folded = stream::iter(payloads.into_iter().enumerate())
            .map(Ok::<(usize, CalendarEventPayload), Halted>)
            .try_fold(ImportReport::default(), move |mut report, (index, payload)| async move {
                report.attempted += 1;
                match calendar.create_event(token, &payload).await {
                    Ok(created) => {
                        info!(index, summary = %created.summary, id = ?created.id, "event created");
                        report.created.push(created);
                        Ok(report)
                    }
                    Err(error) => Err(Halted {
                        report,
                        failure: ImportFailure::Submission {
                            index,
                            summary: payload.summary,
                            error,
                        },
                    }),
                }
            })
            .await;

        match folded {
            Ok(report) => {
                info!(created = report.succeeded(), "events created");
                report
            }
            Err(Halted { mut report, failure }) => {
                warn!(
                    created = report.succeeded(),
                    error = %failure,
                    "import stopped at first failure"
                );
                report.failure = Some(failure);
                report
            }
        }
    }
}
