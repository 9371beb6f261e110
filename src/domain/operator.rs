// ==========================================
// FleetFlow - Operator domain model
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// OperatorAssignment
// ==========================================
// Store invariant: no two assignments of one operator overlap (inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAssignment {
    pub id: String,
    pub request_id: String,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Insert payload for a new assignment; dates are copied from the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperatorAssignment {
    pub request_id: String,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// ==========================================
// OperatorMatch (ephemeral ranking output)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorMatch {
    pub operator_id: String,
    pub operator_name: String,
    pub distance_km: Option<f64>,
}

/// Certification held by an operator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorTicket {
    pub operator_id: String,
    pub ticket_code: String,
}

/// Ascending distance, unknown distances last.
///
/// `sort_by` is stable, so ties keep the upstream order.
pub fn sort_operator_matches(matches: &mut [OperatorMatch]) {
    matches.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
