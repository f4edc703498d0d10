use reqwest::StatusCode;
use serde::Deserialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DeckError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    /// Non-success status from the API. Displays as the message alone so
    /// callers can put it straight into an error banner.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Not logged in")]
    NotAuthenticated,
}

impl DeckError {
    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, DeckError::Reqwest(e) if !e.is_status() && !e.is_decode())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DeckError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<figment::Error> for DeckError {
    fn from(e: figment::Error) -> Self {
        DeckError::Config(Box::new(e))
    }
}

/// Error body returned by the provisioning API.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Extract a usable message from a raw error body. Anything that is not
    /// JSON with a non-empty `message` yields `None`.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_bare_message() {
        let err = DeckError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid email or password".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn message_from_ignores_non_json_and_blank() {
        assert_eq!(
            ApiErrorBody::message_from(br#"{"message":"Email already exists"}"#).as_deref(),
            Some("Email already exists")
        );
        assert_eq!(ApiErrorBody::message_from(b"<html>oops</html>"), None);
        assert_eq!(ApiErrorBody::message_from(br#"{"message":""}"#), None);
        assert_eq!(ApiErrorBody::message_from(br#"{"error":"x"}"#), None);
        assert_eq!(ApiErrorBody::message_from(b""), None);
    }
}
