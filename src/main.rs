#![allow(non_snake_case)]

use std::env;
use std::process;

use syllabusCal::cli;
use syllabusCal::config::{AppConfig, RunMode, Settings};
use syllabusCal::models::session::AuthSession;
use syllabusCal::runtime;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(error = %err, "ignoring config file");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    };

    let settings = match Settings::resolve(&config) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            process::exit(2);
        }
    };

    let flow = runtime::build_flow(
        settings.openai.clone(),
        &settings.calendar_api_url,
        settings.time_zone,
    );

    match settings.run_mode {
        RunMode::Api => runtime::run_api(flow, settings.bind_addr).await,
        RunMode::Cli => {
            let session = settings
                .provider_token
                .clone()
                .map(|token| AuthSession::new(settings.user_email.clone(), token));
            if let Err(err) = cli::cli(flow, session).await {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    }
}
