// ==========================================
// FleetFlow - Calendar API
// ==========================================
// Week view over allocation events (Monday-based) with the site,
// contract status and operated filters.
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::calendar::{parse_date, week_days};
use crate::domain::{CalendarEvent, CalendarFilter};
use crate::store::ResourceStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub days: Vec<NaiveDate>,
    /// Events dated inside the week, ordered by date
    pub events: Vec<CalendarEvent>,
}

pub struct CalendarApi {
    store: Arc<dyn ResourceStore>,
}

impl CalendarApi {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub async fn events(&self, filter: &CalendarFilter) -> ApiResult<Vec<CalendarEvent>> {
        let events = self.store.list_calendar_events().await?;
        Ok(filter.apply(events))
    }

    /// Week containing `date` (`YYYY-MM-DD`)
    pub async fn week_view(&self, date: &str, filter: &CalendarFilter) -> ApiResult<WeekView> {
        let days = week_days(parse_date(date)?);
        let (first, last) = (days[0], days[6]);

        let mut events: Vec<CalendarEvent> = self
            .events(filter)
            .await?
            .into_iter()
            .filter(|e| e.date >= first && e.date <= last)
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(WeekView {
            week_start: first,
            days: days.to_vec(),
            events,
        })
    }

    /// Monday of every week that has at least one allocation
    pub async fn week_starts(&self) -> ApiResult<Vec<NaiveDate>> {
        Ok(self.store.week_starts().await?)
    }
}
