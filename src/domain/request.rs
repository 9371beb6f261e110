// ==========================================
// FleetFlow - Hire request
// ==========================================
// Created by contract intake; read-only for the engine
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A demand for `quantity` units of an equipment group over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HireRequest {
    pub id: String,
    pub contract_id: String,
    pub group_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quantity: u32,
    pub operated: bool,
    pub site_lat: f64,
    pub site_lon: f64,
}

impl HireRequest {
    pub fn has_valid_date_range(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Units still to satisfy given the already-satisfied count
    pub fn remaining(&self, existing_count: u32) -> u32 {
        self.quantity.saturating_sub(existing_count)
    }
}
