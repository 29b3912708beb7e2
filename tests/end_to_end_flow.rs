use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono_tz::America::New_York;
use syllabusCal::clients::calendar_client::CalendarError;
use syllabusCal::clients::openai_client::{OpenAIError, OpenAISettings};
use syllabusCal::handlers::syllabus_flow::{ConfirmedBatch, SubmitDecision, SyllabusFlow};
use syllabusCal::models::event::{CalendarEventPayload, CreatedEvent};
use syllabusCal::models::session::AuthSession;
use syllabusCal::runtime::build_flow;
use syllabusCal::service::calendar_service::CalendarClient;
use syllabusCal::service::extraction_service::{ExtractionError, ExtractionService};
use syllabusCal::service::import_service::ImportService;
use syllabusCal::service::openai_service::OpenAIClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MIDTERM_REPLY: &str = r#"[{"event_Name":"History Midterm","event_Description":null,"start_time":"March 3, 2024 09:00:00","end_time":"March 3, 2024 12:00:00"}]"#;

struct FakeOpenAI {
    response: Result<String, String>,
}

#[async_trait]
impl OpenAIClient for FakeOpenAI {
    async fn generate_prompt(
        &self,
        _prompt: &str,
        _prompt_type: &str,
    ) -> Result<String, OpenAIError> {
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(err) => Err(OpenAIError::Status {
                status: 401,
                body: err.clone(),
            }),
        }
    }
}

#[derive(Default)]
struct CapturingCalendar {
    payloads: Mutex<Vec<CalendarEventPayload>>,
}

#[async_trait]
impl CalendarClient for CapturingCalendar {
    async fn create_event(
        &self,
        _access_token: &str,
        payload: &CalendarEventPayload,
    ) -> Result<CreatedEvent, CalendarError> {
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(CreatedEvent {
            summary: payload.summary.clone(),
            id: Some("evt-midterm".to_string()),
            html_link: None,
        })
    }
}

fn flow_with(openai: FakeOpenAI, calendar: Arc<CapturingCalendar>) -> SyllabusFlow {
    SyllabusFlow::new(
        ExtractionService::new(Arc::new(openai)),
        ImportService::new(calendar, New_York),
    )
}

#[tokio::test]
async fn midterm_is_extracted_confirmed_and_imported() {
    let calendar = Arc::new(CapturingCalendar::default());
    let flow = flow_with(
        FakeOpenAI {
            response: Ok(format!("```json\n{}\n```", MIDTERM_REPLY)),
        },
        calendar.clone(),
    );

    let batch = match flow.submit("History 101. Midterm on March 3.").await {
        SubmitDecision::AwaitConfirmation(batch) => batch,
        other => panic!("expected events, got {:?}", other),
    };
    assert_eq!(batch.events().len(), 1);
    assert_eq!(batch.events()[0].name.as_deref(), Some("History Midterm"));
    assert_eq!(batch.events()[0].description, None);
    assert_eq!(
        batch.summary(),
        "(History Midterm: March 3, 2024 09:00:00 to March 3, 2024 12:00:00)|"
    );

    let report = flow
        .import(batch.confirm(), &AuthSession::new(None, "ya29.token"))
        .await;

    assert!(report.is_success());
    assert_eq!(report.attempted, 1);
    let payloads = calendar.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].summary, "History Midterm");
    assert_eq!(payloads[0].start.date_time, "2024-03-03T14:00:00.000Z");
    assert_eq!(payloads[0].end.date_time, "2024-03-03T17:00:00.000Z");
    assert_eq!(payloads[0].start.time_zone, "America/New_York");
}

#[tokio::test]
async fn no_dates_and_model_errors_are_told_apart() {
    let calendar = Arc::new(CapturingCalendar::default());

    let empty = flow_with(
        FakeOpenAI {
            response: Ok("[]".to_string()),
        },
        calendar.clone(),
    );
    assert!(matches!(empty.submit("Welcome to class").await, SubmitDecision::NoEvents));

    let failing = flow_with(
        FakeOpenAI {
            response: Err("invalid api key".to_string()),
        },
        calendar.clone(),
    );
    assert!(matches!(
        failing.submit("Welcome to class").await,
        SubmitDecision::Failed(ExtractionError::Transport(_))
    ));
    assert!(calendar.payloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn production_wiring_talks_to_both_apis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": MIDTERM_REPLY } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(header("Authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "abc123",
            "htmlLink": "https://www.google.com/calendar/event?eid=abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = OpenAISettings {
        api_key: "sk-test".to_string(),
        model: "gpt-3.5-turbo".to_string(),
        api_url: format!("{}/v1/chat/completions", server.uri()),
    };
    let flow = build_flow(settings, &format!("{}/calendar/v3", server.uri()), New_York);

    let batch = match flow.submit("Midterm on March 3").await {
        SubmitDecision::AwaitConfirmation(batch) => batch,
        other => panic!("expected events, got {:?}", other),
    };
    let report = flow
        .import(batch.confirm(), &AuthSession::new(None, "ya29.token"))
        .await;

    assert!(report.is_success());
    assert_eq!(report.created[0].id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn empty_confirmed_batch_creates_nothing() {
    let calendar = Arc::new(CapturingCalendar::default());
    let flow = flow_with(
        FakeOpenAI {
            response: Ok("[]".to_string()),
        },
        calendar.clone(),
    );

    let report = flow
        .import(ConfirmedBatch::from_events(Vec::new()), &AuthSession::new(None, "ya29.token"))
        .await;

    assert!(report.is_success());
    assert_eq!(report.attempted, 0);
    assert!(calendar.payloads.lock().unwrap().is_empty());
}
