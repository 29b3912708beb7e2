use std::convert::Infallible;
use std::sync::Arc;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};
use warp::{Filter, Rejection};

use crate::handlers::syllabus_flow::{ConfirmedBatch, SubmitDecision, SyllabusFlow};
use crate::models::event::{CreatedEvent, ExtractedEvent};
use crate::models::session::AuthSession;
use crate::service::confirmation::{EXTRACTION_FAILED_MESSAGE, NO_DATES_MESSAGE, render_import_result};
use crate::service::import_service::{ImportFailure, ImportReport};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub syllabus_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub events: Vec<ExtractedEvent>,
    /// IANA zone the caller's wall-clock times are in; the server zone otherwise.
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractResponse {
    Events {
        summary: String,
        events: Vec<ExtractedEvent>,
    },
    Empty {
        message: String,
    },
    Failure {
        message: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub attempted: usize,
    pub created: Vec<CreatedEvent>,
    pub failed_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub error: String,
}

impl From<&ImportReport> for ImportResponse {
    fn from(report: &ImportReport) -> Self {
        Self {
            success: report.is_success(),
            message: render_import_result(report),
            attempted: report.attempted,
            created: report.created.clone(),
            failed_index: report.failure.as_ref().map(ImportFailure::index),
        }
    }
}

pub fn routes(
    flow: Arc<SyllabusFlow>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "ok".into_response());

    let extract = warp::path!("api" / "extract")
        .and(warp::post())
        .and(warp::body::json::<ExtractRequest>())
        .and(with_flow(flow.clone()))
        .then(handle_extract);

    let import = warp::path!("api" / "import")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::header::optional::<String>("x-user-email"))
        .and(warp::body::json::<ImportRequest>())
        .and(with_flow(flow))
        .then(handle_import);

    health.or(extract).unify().or(import).unify()
}

fn with_flow(
    flow: Arc<SyllabusFlow>,
) -> impl Filter<Extract = (Arc<SyllabusFlow>,), Error = Infallible> + Clone {
    warp::any().map(move || flow.clone())
}

async fn handle_extract(request: ExtractRequest, flow: Arc<SyllabusFlow>) -> Response {
    let (status, body) = match flow.submit(&request.syllabus_text).await {
        SubmitDecision::AwaitConfirmation(batch) => (
            StatusCode::OK,
            ExtractResponse::Events {
                summary: batch.summary().to_string(),
                events: batch.into_events(),
            },
        ),
        SubmitDecision::NoEvents => (
            StatusCode::OK,
            ExtractResponse::Empty {
                message: NO_DATES_MESSAGE.to_string(),
            },
        ),
        SubmitDecision::Failed(err) => (
            StatusCode::BAD_GATEWAY,
            ExtractResponse::Failure {
                message: EXTRACTION_FAILED_MESSAGE.to_string(),
                error: err.to_string(),
            },
        ),
    };
    reply::with_status(reply::json(&body), status).into_response()
}

async fn handle_import(
    authorization: Option<String>,
    email: Option<String>,
    request: ImportRequest,
    flow: Arc<SyllabusFlow>,
) -> Response {
    let Some(token) = authorization.as_deref().and_then(bearer_token) else {
        return error_response("Missing bearer token", StatusCode::UNAUTHORIZED);
    };

    let time_zone = match request.time_zone.as_deref().map(str::parse::<Tz>) {
        None => None,
        Some(Ok(zone)) => Some(zone),
        Some(Err(_)) => {
            return error_response("Unknown time_zone", StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let session = AuthSession::new(email, token).with_time_zone(time_zone);
    let report = flow
        .import(ConfirmedBatch::from_events(request.events), &session)
        .await;

    let status = match &report.failure {
        None => StatusCode::OK,
        Some(ImportFailure::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ImportFailure::Submission { .. }) => StatusCode::BAD_GATEWAY,
    };
    reply::with_status(reply::json(&ImportResponse::from(&report)), status).into_response()
}

fn error_response(message: &str, status: StatusCode) -> Response {
    reply::with_status(
        reply::json(&ErrorMessage {
            error: message.to_string(),
        }),
        status,
    )
    .into_response()
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
