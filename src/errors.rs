use axum::{extract::rejection::JsonRejection, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no debrief stored for week {0}")]
    Missing(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DebriefError {
    #[error("invalid week label '{0}'")]
    InvalidLabel(String),
    #[error("no week is open in this session")]
    NoActiveWeek,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

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

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DebriefError> for AppError {
    fn from(err: DebriefError) -> Self {
        match err {
            DebriefError::InvalidLabel(_) => Self::bad_request(err.to_string()),
            DebriefError::NoActiveWeek => Self::conflict(err.to_string()),
            DebriefError::Persist(inner) => Self::internal(inner),
        }
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        Self::internal(err)
    }
}

/// Malformed or invalid request bodies, including bad week keys and ratings
/// rejected while deserializing, are the client's fault.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
