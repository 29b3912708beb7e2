use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use inquire::{Editor, Select};
use thiserror::Error;

use crate::handlers::syllabus_flow::{PendingBatch, SubmitDecision, SyllabusFlow};
use crate::models::session::AuthSession;
use crate::service::confirmation::{
    EXIT_CHOICE, IMPORT_CHOICE, NO_DATES_MESSAGE, render_import_result,
};
use crate::service::extraction_service::ExtractionError;

#[derive(Parser)]
#[command(about = "Pull exam and assignment dates out of a syllabus and into Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dates found in a syllabus.
    Extract {
        /// Syllabus text file. Without it, $EDITOR is opened to paste the text.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Find the dates and import them into the primary calendar.
    Import {
        /// Syllabus text file. Without it, $EDITOR is opened to paste the text.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Skip the "Import Dates" / "Exit" confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read syllabus from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("syllabus text is empty")]
    EmptySyllabus,
    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("GOOGLE_PROVIDER_TOKEN must be set to import events")]
    MissingSession,
    #[error("GPT Error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("{0}")]
    Import(String),
}

pub async fn cli(flow: SyllabusFlow, session: Option<AuthSession>) -> Result<(), CliError> {
    let cli = Cli::parse();
    if let Some(session) = &session {
        println!("{}", session.greeting());
    }

    match cli.command {
        Commands::Extract { file } => {
            let text = read_syllabus(file.as_deref())?;
            if let Some(batch) = extract(&flow, &text).await? {
                println!("{}", batch.summary());
            }
            Ok(())
        }
        Commands::Import { file, yes } => {
            let session = session.ok_or(CliError::MissingSession)?;
            let text = read_syllabus(file.as_deref())?;
            let Some(batch) = extract(&flow, &text).await? else {
                return Ok(());
            };
            println!("{}", batch.summary());

            if !yes && !confirm_import()? {
                return Ok(());
            }

            let report = flow.import(batch.confirm(), &session).await;
            let message = render_import_result(&report);
            if report.is_success() {
                println!("{}", message);
                Ok(())
            } else {
                Err(CliError::Import(message))
            }
        }
    }
}

async fn extract(flow: &SyllabusFlow, text: &str) -> Result<Option<PendingBatch>, CliError> {
    match flow.submit(text).await {
        SubmitDecision::AwaitConfirmation(batch) => Ok(Some(batch)),
        SubmitDecision::NoEvents => {
            println!("{}", NO_DATES_MESSAGE);
            Ok(None)
        }
        SubmitDecision::Failed(err) => Err(err.into()),
    }
}

fn read_syllabus(file: Option<&Path>) -> Result<String, CliError> {
    let text = match file {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?,
        None => Editor::new("Paste your syllabus text.")
            .with_file_extension(".txt")
            .with_help_message("save and close the editor when done")
            .prompt()?,
    };
    if text.trim().is_empty() {
        return Err(CliError::EmptySyllabus);
    }
    Ok(text)
}

fn confirm_import() -> Result<bool, CliError> {
    let choice = Select::new("Import these dates?", vec![IMPORT_CHOICE, EXIT_CHOICE]).prompt()?;
    Ok(choice == IMPORT_CHOICE)
}
