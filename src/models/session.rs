use chrono_tz::Tz;

/// Signed-in user as handed over by the OAuth provider.
///
/// `provider_token` is the bearer token for the calendar API; `email` is only
/// ever shown back to the user. `time_zone`, when set, replaces the configured
/// zone for this user's imports.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub email: Option<String>,
    pub provider_token: String,
    pub time_zone: Option<Tz>,
}

impl AuthSession {
    pub fn new(email: Option<String>, provider_token: impl Into<String>) -> Self {
        Self {
            email,
            provider_token: provider_token.into(),
            time_zone: None,
        }
    }

    pub fn with_time_zone(mut self, time_zone: Option<Tz>) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn greeting(&self) -> String {
        match &self.email {
            Some(email) => format!("Hey there {}", email),
            None => "Hey there".to_string(),
        }
    }
}
