// ==========================================
// FleetFlow - API error type
// ==========================================
// Everything leaving the API layer carries a stable code plus the
// translated, user-facing message.
// ==========================================

use crate::engine::error::EngineError;
use crate::engine::error_translator::friendly_error_message;
use crate::store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Rejected by the engine or the store
    #[error("{message}")]
    Rejected { code: String, message: String },

    /// Caller input that could not be parsed (dates, ids)
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl ApiError {
    pub fn rejected(code: impl Into<String>) -> Self {
        let code = code.into();
        ApiError::Rejected {
            message: friendly_error_message(&code),
            code,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ApiError::Rejected { code, .. } => code,
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }

    /// Text to show the coordinator
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Rejected {
            code: err.code(),
            message: err.display_message(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::from(EngineError::from(err))
    }
}

impl From<chrono::ParseError> for ApiError {
    fn from(err: chrono::ParseError) -> Self {
        ApiError::InvalidInput {
            message: format!("date must be YYYY-MM-DD ({})", err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
