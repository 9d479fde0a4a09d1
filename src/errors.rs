use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("DNI must be exactly 8 digits")]
    Validation,
    #[error("record service responded with status {status}")]
    Network { status: u16 },
    #[error("record service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration store responded with status {0}")]
    Status(u16),
    #[error("configuration store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("configuration document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
