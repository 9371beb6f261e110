// ==========================================
// FleetFlow - Error translator
// ==========================================
// Maps store/engine error codes to the message shown to coordinators.
// Total and pure: unknown codes come back unchanged.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Codes with a dedicated user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AllocationOverlap,
    AssignmentOverlap,
    NoInternalAssetAvailable,
    MissingRequiredTickets,
    InvalidDateRange,
    RequestNotFound,
    Unauthorized,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::AllocationOverlap,
        ErrorCode::AssignmentOverlap,
        ErrorCode::NoInternalAssetAvailable,
        ErrorCode::MissingRequiredTickets,
        ErrorCode::InvalidDateRange,
        ErrorCode::RequestNotFound,
        ErrorCode::Unauthorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AllocationOverlap => "ALLOCATION_OVERLAP",
            ErrorCode::AssignmentOverlap => "ASSIGNMENT_OVERLAP",
            ErrorCode::NoInternalAssetAvailable => "NO_INTERNAL_ASSET_AVAILABLE",
            ErrorCode::MissingRequiredTickets => "MISSING_REQUIRED_TICKETS",
            ErrorCode::InvalidDateRange => "INVALID_DATE_RANGE",
            ErrorCode::RequestNotFound => "REQUEST_NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::AllocationOverlap => "Allocation overlaps with existing allocation",
            ErrorCode::AssignmentOverlap => "Operator already assigned for this period",
            ErrorCode::NoInternalAssetAvailable => "No internal asset available",
            ErrorCode::MissingRequiredTickets => "Operator is missing required tickets",
            ErrorCode::InvalidDateRange => "Start date must be before end date",
            ErrorCode::RequestNotFound => "Request not found",
            ErrorCode::Unauthorized => "You are not authorized to perform this action",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

/// Translate a raw code into display text.
///
/// Matching is exact; anything outside the known set is returned verbatim.
pub fn friendly_error_message(code: &str) -> String {
    match code.parse::<ErrorCode>() {
        Ok(known) => known.message().to_string(),
        Err(()) => code.to_string(),
    }
}
