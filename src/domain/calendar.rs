// ==========================================
// FleetFlow - Calendar model
// ==========================================
// Calendar events derived from allocations, Monday-based weeks,
// and the site / status / operated filters of the calendar view
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Calendar-date wire format (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub site: Option<String>,
    pub contract_status: Option<String>,
    pub operated: Option<bool>,
    pub asset_code: Option<String>,
    pub operator_name: Option<String>,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The seven days (Monday first) of the week containing `date`
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(date);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Distinct week starts touched by any of the inclusive ranges, ascending
pub fn week_starts_spanning<I>(ranges: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = (NaiveDate, NaiveDate)>,
{
    let mut weeks = BTreeSet::new();
    for (start, end) in ranges {
        if start > end {
            continue;
        }
        let mut week = week_start(start);
        while week <= end {
            weeks.insert(week);
            week = week + Duration::days(7);
        }
    }
    weeks.into_iter().collect()
}

// ==========================================
// CalendarFilter
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatedFilter {
    #[default]
    All,
    Operated,
    NonOperated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFilter {
    /// `None` = all sites
    pub site: Option<String>,
    /// `None` = all statuses
    pub contract_status: Option<String>,
    pub operated: OperatedFilter,
}

impl CalendarFilter {
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if let Some(site) = &self.site {
            if event.site.as_deref() != Some(site.as_str()) {
                return false;
            }
        }
        if let Some(status) = &self.contract_status {
            if event.contract_status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }
        let operated = event.operated.unwrap_or(false);
        match self.operated {
            OperatedFilter::All => true,
            OperatedFilter::Operated => operated,
            OperatedFilter::NonOperated => !operated,
        }
    }

    pub fn apply(&self, events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
