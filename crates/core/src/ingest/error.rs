use serde::Serialize;
use std::fmt;

const MAX_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    BadStatus,
    Parse,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a status >= 400.
    BadStatus { status: u16, body: String },
    /// The body was not JSON, or not an array of case records.
    Parse { detail: String },
    /// No usable response: connect, timeout, or body read failure.
    Transport { detail: String },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::BadStatus { .. } => FetchErrorKind::BadStatus,
            FetchError::Parse { .. } => FetchErrorKind::Parse,
            FetchError::Transport { .. } => FetchErrorKind::Transport,
        }
    }

    pub(crate) fn bad_status(status: u16, body: &str) -> Self {
        FetchError::BadStatus {
            status,
            body: truncate(body),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::BadStatus { status, body } => {
                write!(f, "bad response from server (HTTP {status}): {body}")
            }
            FetchError::Parse { detail } => write!(f, "response is not a valid series: {detail}"),
            FetchError::Transport { detail } => write!(f, "request failed: {detail}"),
        }
    }
}

impl std::error::Error for FetchError {}

fn truncate(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_BODY_CHARS).collect();
    out.push_str("...");
    out
}
