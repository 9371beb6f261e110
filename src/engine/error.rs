// ==========================================
// FleetFlow - Engine error type
// ==========================================

use crate::domain::{AccessContext, AssignmentState, Permission, Role};
use crate::engine::error_translator::friendly_error_message;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("operator {operator_id} is missing tickets for group {group_id}: {missing:?}")]
    MissingRequiredTickets {
        group_id: String,
        operator_id: String,
        missing: Vec<String>,
    },

    #[error("role {role} is not permitted to {permission}")]
    Unauthorized { role: Role, permission: Permission },

    #[error("request not found: {0}")]
    RequestNotFound(String),

    #[error("invalid date range on request {0}")]
    InvalidDateRange(String),

    #[error("request {0} does not need operator assignment")]
    RequestNotAssignable(String),

    #[error("illegal assignment transition {from:?} -> {to:?}")]
    InvalidStateTransition {
        from: AssignmentState,
        to: AssignmentState,
    },
}

impl EngineError {
    pub fn code(&self) -> String {
        match self {
            EngineError::Store(err) => err.code(),
            EngineError::MissingRequiredTickets { .. } => "MISSING_REQUIRED_TICKETS".to_string(),
            EngineError::Unauthorized { .. } => "UNAUTHORIZED".to_string(),
            EngineError::RequestNotFound(_) => "REQUEST_NOT_FOUND".to_string(),
            EngineError::InvalidDateRange(_) => "INVALID_DATE_RANGE".to_string(),
            EngineError::RequestNotAssignable(_) => "REQUEST_NOT_ASSIGNABLE".to_string(),
            EngineError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION".to_string(),
        }
    }

    /// Text for the coordinator (translated code)
    pub fn display_message(&self) -> String {
        friendly_error_message(&self.code())
    }
}

/// Error retained by an orchestrator for display after a failed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub code: String,
    pub message: String,
}

impl From<&EngineError> for FailureReport {
    fn from(err: &EngineError) -> Self {
        Self {
            code: err.code(),
            message: err.display_message(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// `UNAUTHORIZED` unless the caller's role grants `permission`
pub fn authorize(ctx: &AccessContext, permission: Permission) -> EngineResult<()> {
    if ctx.can(permission) {
        Ok(())
    } else {
        Err(EngineError::Unauthorized {
            role: ctx.role,
            permission,
        })
    }
}
