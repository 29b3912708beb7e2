use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub const SYLLABUS_DATES_PROMPT: &str = "syllabus_dates";

#[derive(Error, Debug)]
pub enum OpenAIError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse completion response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no response from OpenAI")]
    NoChoices,
    #[error("not a valid base prompt: {0}")]
    UnknownPrompt(String),
}

#[derive(Debug, Clone)]
pub struct OpenAISettings {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl OpenAISettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// System and user messages for one prompt type.
#[derive(Debug)]
pub struct ChatPrompt {
    pub system: &'static str,
    pub user: String,
}

/// Builds the messages for `prompt_type` around `prompt`.
///
/// The input is interpolated as-is; nothing is escaped.
pub fn build_prompt(prompt: &str, prompt_type: &str) -> Result<ChatPrompt, OpenAIError> {
    match prompt_type {
        SYLLABUS_DATES_PROMPT => Ok(ChatPrompt {
            system: "You are a helpful assistant that extracts and organizes due dates for assignments and exams from syllabi.",
            user: format!(
                "Extract exams and assignment due dates (only one-day events) from the syllabus: \"{syllabus}\".\n\
                 Provide the events in JSON format with fields:\n\
                 - event_Name\n\
                 - event_Description\n\
                 - start_time (Month Day, Year Hour:Minute:Second, default to January 1, 2024 09:00:00 if date/time not provided)\n\
                 - end_time (Month Day, Year Hour:Minute:Second, default to January 1, 2024 12:00:00 if date/time not provided).\n\
                 If any field is not available, return it as null.\n\
                 If no dates are available, return the array as empty.\n\
                 Example format: [{{ \"event_Name\": \"Calc III Exam 1\", \"event_Description\": \"Chapter 1-3\", \"start_time\": \"September 15, 2021 09:00:00\", \"end_time\": \"September 15, 2021 12:00:00\" }}, ...]\n\
                 Make course recognizable. Instead of \"Test 1\", say \"History Test 1\".",
                syllabus = prompt
            ),
        }),
        other => Err(OpenAIError::UnknownPrompt(other.to_string())),
    }
}

pub async fn generate_openai_prompt(
    prompt: &str,
    prompt_type: &str,
    settings: &OpenAISettings,
) -> Result<String, OpenAIError> {
    let chat = build_prompt(prompt, prompt_type)?;
    debug!(model = %settings.model, prompt_type, "sending chat completion request");
    query_openai(chat, settings).await
}

async fn query_openai(chat: ChatPrompt, settings: &OpenAISettings) -> Result<String, OpenAIError> {
    let request = OpenAIRequest {
        model: settings.model.clone(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: chat.system.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: chat.user,
            },
        ],
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&settings.api_url)
        .header("Authorization", format!("Bearer {}", settings.api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), body = %text, "chat completion request rejected");
        return Err(OpenAIError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(OpenAIError::NoChoices)
}
