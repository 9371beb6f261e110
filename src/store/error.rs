// ==========================================
// FleetFlow - Store error type
// ==========================================
// Remote procedures and triggers abort with a bare upper-snake code
// (e.g. ALLOCATION_OVERLAP); those surface as `Rejected { code }`
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    // ===== Rejected by the store (constraint / procedure) =====
    #[error("store rejected the operation: {code}")]
    Rejected { code: String },

    #[error("{entity} not found: id={id}")]
    NotFound { entity: String, id: String },

    // ===== Infrastructure =====
    #[error("database error: {0}")]
    Database(String),

    #[error("failed to acquire database lock: {0}")]
    LockError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn rejected(code: impl Into<String>) -> Self {
        StoreError::Rejected { code: code.into() }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Stable code used by the error translator.
    ///
    /// Infrastructure failures have no code of their own, so their
    /// message is passed through verbatim.
    pub fn code(&self) -> String {
        match self {
            StoreError::Rejected { code } => code.clone(),
            StoreError::NotFound { entity, .. } => {
                format!("{}_NOT_FOUND", entity.to_uppercase())
            }
            StoreError::Database(msg) | StoreError::LockError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_rejection(&self, code: &str) -> bool {
        matches!(self, StoreError::Rejected { code: c } if c == code)
    }
}

/// Whether a message is a bare error code such as `ASSIGNMENT_OVERLAP`
pub fn looks_like_error_code(msg: &str) -> bool {
    !msg.is_empty()
        && msg.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && msg.chars().next().map_or(false, |c| c.is_ascii_uppercase())
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if looks_like_error_code(msg.trim()) {
                    StoreError::Rejected {
                        code: msg.trim().to_string(),
                    }
                } else {
                    StoreError::Database(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
