use std::net::SocketAddr;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::info;

use crate::clients::openai_client::OpenAISettings;
use crate::handlers::http;
use crate::handlers::syllabus_flow::SyllabusFlow;
use crate::service::calendar_service::GoogleCalendarService;
use crate::service::extraction_service::ExtractionService;
use crate::service::import_service::ImportService;
use crate::service::openai_service::OpenAIService;

/// Wires the production OpenAI and Google Calendar services into one flow.
pub fn build_flow(openai: OpenAISettings, calendar_api_url: &str, time_zone: Tz) -> SyllabusFlow {
    let extraction = ExtractionService::new(Arc::new(OpenAIService::new(openai)));
    let import = ImportService::new(
        Arc::new(GoogleCalendarService::new(calendar_api_url)),
        time_zone,
    );
    SyllabusFlow::new(extraction, import)
}

pub async fn run_api(flow: SyllabusFlow, bind_addr: SocketAddr) {
    info!(%bind_addr, "serving syllabus API");
    warp::serve(http::routes(Arc::new(flow))).run(bind_addr).await;
}
