use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::clients::openai_client::{OpenAIError, SYLLABUS_DATES_PROMPT};
use crate::models::event::ExtractedEvent;
use crate::service::normalizer::{self, SchemaError};
use crate::service::openai_service::OpenAIClient;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("language model call failed: {0}")]
    Transport(#[from] OpenAIError),
    #[error("language model reply did not match the event schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Result of one extraction call. Exactly one variant per call.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Events(Vec<ExtractedEvent>),
    Empty,
    Failure(ExtractionError),
}

pub struct ExtractionService {
    openai: Arc<dyn OpenAIClient>,
}

impl ExtractionService {
    pub fn new(openai: Arc<dyn OpenAIClient>) -> Self {
        Self { openai }
    }

    pub async fn extract(&self, syllabus_text: &str) -> ExtractionOutcome {
        info!(chars = syllabus_text.chars().count(), "extracting dates from syllabus");

        let reply = match self
            .openai
            .generate_prompt(syllabus_text, SYLLABUS_DATES_PROMPT)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "error parsing dates with language model");
                return ExtractionOutcome::Failure(ExtractionError::Transport(err));
            }
        };

        let outcome = normalizer::normalize(&reply);
        match &outcome {
            ExtractionOutcome::Events(events) => info!(count = events.len(), "extracted events"),
            ExtractionOutcome::Empty => info!("no dates found in syllabus"),
            ExtractionOutcome::Failure(err) => warn!(error = %err, "could not normalize reply"),
        }
        outcome
    }
}
