use async_trait::async_trait;

use crate::clients::calendar_client::{self, CalendarError};
use crate::models::event::{CalendarEventPayload, CreatedEvent};

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn create_event(
        &self,
        access_token: &str,
        payload: &CalendarEventPayload,
    ) -> Result<CreatedEvent, CalendarError>;
}

pub struct GoogleCalendarService {
    api_url: String,
}

impl GoogleCalendarService {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarService {
    async fn create_event(
        &self,
        access_token: &str,
        payload: &CalendarEventPayload,
    ) -> Result<CreatedEvent, CalendarError> {
        calendar_client::insert_event(&self.api_url, access_token, payload).await
    }
}
