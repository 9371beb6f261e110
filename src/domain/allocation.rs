// ==========================================
// FleetFlow - Allocation domain model
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Allocation
// ==========================================
// Store invariant: no two allocations of one asset overlap (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub asset_code: String,
    pub group_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub request_id: Option<String>,
}

impl Allocation {
    /// Inclusive range intersection
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

// ==========================================
// ExternalHire
// ==========================================
// One externally sourced unit; counts toward the request quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHire {
    pub id: String,
    pub contract_id: String,
    pub request_id: Option<String>,
}

// ==========================================
// AssetScore (ephemeral)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetScore {
    pub asset_code: String,
    pub score: f64,
}

/// Sort scores best first; equal scores keep input order
pub fn sort_asset_scores(scores: &mut [AssetScore]) {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
}
