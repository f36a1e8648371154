// src/registration/outcome.rs

use serde::Deserialize;
use std::fmt;
use tracing::debug;

const DATABASE_ERROR_MARKER: &str = "OCI_EXECUTE ERROR";
const SUCCESS_MARKER: &str = "Registration Successful";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success,
    ServerError,
    InvalidResponse,
    RequestFailed(String),
    Rejected(String),
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success)
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationOutcome::Success => write!(f, "registered"),
            RegistrationOutcome::ServerError => write!(f, "server returned a database error"),
            RegistrationOutcome::InvalidResponse => write!(f, "response was not valid JSON"),
            RegistrationOutcome::RequestFailed(reason) => write!(f, "request failed: {reason}"),
            RegistrationOutcome::Rejected(message) => write!(f, "rejected: {message}"),
        }
    }
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Classifies one `registerSections` response. The status code is not
/// trusted on its own; the portal answers 200 for most failures.
pub fn classify(status: u16, body: &str) -> RegistrationOutcome {
    debug!(status, body = body.trim(), "Classifying registration response");
    if body.contains(DATABASE_ERROR_MARKER) {
        return RegistrationOutcome::ServerError;
    }

    let parsed: RegisterResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return RegistrationOutcome::InvalidResponse,
    };

    match parsed.message {
        Some(message) if message.contains(SUCCESS_MARKER) => RegistrationOutcome::Success,
        Some(message) => RegistrationOutcome::Rejected(message),
        None => RegistrationOutcome::Rejected("Unknown error.".to_string()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseResult {
    pub course: String,
    pub outcome: RegistrationOutcome,
}

/// Tally of one registration run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub results: Vec<CourseResult>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, course: &str, outcome: RegistrationOutcome) {
        self.results.push(CourseResult {
            course: course.to_string(),
            outcome,
        });
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CourseResult> {
        self.results.iter().filter(|r| !r.outcome.is_success())
    }
}
