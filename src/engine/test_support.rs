// ==========================================
// Scripted in-memory store for engine unit tests
// ==========================================
// Counts every collaborator call, replays scripted allocate outcomes
// and can inject a one-shot failure per method.
// ==========================================

use crate::domain::calendar::week_starts_spanning;
use crate::domain::{
    Allocation, AssetScore, CalendarEvent, ExternalHire, GroupRequiredTicket, GroupSubstitution,
    HireRequest, NewOperatorAssignment, OperatorAssignment, OperatorMatch, OperatorTicket,
};
use crate::engine::events::{FleetEvent, FleetEventPublisher};
use crate::store::{looks_like_error_code, ResourceStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::error::Error;
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_request(id: &str, quantity: u32, operated: bool) -> HireRequest {
    HireRequest {
        id: id.to_string(),
        contract_id: "c1".to_string(),
        group_id: "g1".to_string(),
        start_date: date(2024, 5, 6),
        end_date: date(2024, 5, 10),
        quantity,
        operated,
        site_lat: -33.86,
        site_lon: 151.21,
    }
}

pub fn operator_match(id: &str, distance_km: Option<f64>) -> OperatorMatch {
    OperatorMatch {
        operator_id: id.to_string(),
        operator_name: format!("Operator {}", id),
        distance_km,
    }
}

#[derive(Default)]
struct MockState {
    calls: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, String>,
    allocate_script: VecDeque<Result<(), String>>,
    requests: HashMap<String, HireRequest>,
    allocations: Vec<Allocation>,
    external_hires: Vec<ExternalHire>,
    assignments: Vec<OperatorAssignment>,
    required_tickets: HashMap<String, Vec<String>>,
    operator_tickets: HashMap<String, Vec<String>>,
    substitutions: HashMap<String, Vec<String>>,
    matches: Vec<OperatorMatch>,
}

#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Builders =====

    pub fn with_request(self, request: HireRequest) -> Self {
        self.state
            .lock()
            .unwrap()
            .requests
            .insert(request.id.clone(), request);
        self
    }

    /// Outcomes for successive allocate_best_asset calls (`Ok` once exhausted)
    pub fn with_allocate_script(self, outcomes: &[Result<(), &str>]) -> Self {
        self.state.lock().unwrap().allocate_script = outcomes
            .iter()
            .map(|o| (*o).map_err(|code| code.to_string()))
            .collect();
        self
    }

    pub fn with_required_tickets(self, group_id: &str, tickets: &[&str]) -> Self {
        self.state.lock().unwrap().required_tickets.insert(
            group_id.to_string(),
            tickets.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_operator_tickets(self, operator_id: &str, tickets: &[&str]) -> Self {
        self.state.lock().unwrap().operator_tickets.insert(
            operator_id.to_string(),
            tickets.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_substitutions(self, group_id: &str, substitutes: &[&str]) -> Self {
        self.state.lock().unwrap().substitutions.insert(
            group_id.to_string(),
            substitutes.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Rank output, returned as-is (unsorted)
    pub fn with_matches(self, matches: Vec<OperatorMatch>) -> Self {
        self.state.lock().unwrap().matches = matches;
        self
    }

    pub fn with_allocation(self, allocation: Allocation) -> Self {
        self.state.lock().unwrap().allocations.push(allocation);
        self
    }

    pub fn with_assignment(self, assignment: OperatorAssignment) -> Self {
        self.state.lock().unwrap().assignments.push(assignment);
        self
    }

    // ===== Inspection / injection =====

    /// Next call to `method` fails with `message` (bare codes become rejections)
    pub fn fail_next(&self, method: &'static str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method, message.to_string());
    }

    pub fn calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    pub fn allocations(&self) -> Vec<Allocation> {
        self.state.lock().unwrap().allocations.clone()
    }

    pub fn external_hires(&self) -> Vec<ExternalHire> {
        self.state.lock().unwrap().external_hires.clone()
    }

    pub fn assignments(&self) -> Vec<OperatorAssignment> {
        self.state.lock().unwrap().assignments.clone()
    }

    fn enter(&self, method: &'static str) -> StoreResult<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(method).or_insert(0) += 1;
        if let Some(message) = state.failures.remove(method) {
            return Err(to_store_error(message));
        }
        Ok(state)
    }
}

fn to_store_error(message: String) -> StoreError {
    if looks_like_error_code(&message) {
        StoreError::Rejected { code: message }
    } else {
        StoreError::Database(message)
    }
}

fn event_for(allocation: &Allocation) -> CalendarEvent {
    CalendarEvent {
        id: allocation.id.clone(),
        date: allocation.start_date,
        title: format!("{} - {}", allocation.asset_code, allocation.group_id),
        site: None,
        contract_status: None,
        operated: None,
        asset_code: Some(allocation.asset_code.clone()),
        operator_name: None,
    }
}

#[async_trait]
impl ResourceStore for MockStore {
    async fn get_request(&self, request_id: &str) -> StoreResult<Option<HireRequest>> {
        let state = self.enter("get_request")?;
        Ok(state.requests.get(request_id).cloned())
    }

    async fn list_requests(&self) -> StoreResult<Vec<HireRequest>> {
        let state = self.enter("list_requests")?;
        let mut requests: Vec<_> = state.requests.values().cloned().collect();
        requests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(requests)
    }

    async fn list_allocations(&self) -> StoreResult<Vec<Allocation>> {
        Ok(self.enter("list_allocations")?.allocations.clone())
    }

    async fn list_allocations_for_request(&self, request_id: &str) -> StoreResult<Vec<Allocation>> {
        let state = self.enter("list_allocations_for_request")?;
        Ok(state
            .allocations
            .iter()
            .filter(|a| a.request_id.as_deref() == Some(request_id))
            .cloned()
            .collect())
    }

    async fn list_external_hires(&self) -> StoreResult<Vec<ExternalHire>> {
        Ok(self.enter("list_external_hires")?.external_hires.clone())
    }

    async fn list_external_hires_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<ExternalHire>> {
        let state = self.enter("list_external_hires_for_request")?;
        Ok(state
            .external_hires
            .iter()
            .filter(|h| h.request_id.as_deref() == Some(request_id))
            .cloned()
            .collect())
    }

    async fn list_operator_assignments(&self) -> StoreResult<Vec<OperatorAssignment>> {
        Ok(self.enter("list_operator_assignments")?.assignments.clone())
    }

    async fn list_assignments_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<OperatorAssignment>> {
        let state = self.enter("list_assignments_for_request")?;
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn list_calendar_events(&self) -> StoreResult<Vec<CalendarEvent>> {
        let state = self.enter("list_calendar_events")?;
        Ok(state.allocations.iter().map(event_for).collect())
    }

    async fn allocate_best_asset(&self, request_id: &str) -> StoreResult<()> {
        let mut state = self.enter("allocate_best_asset")?;
        if let Some(Err(code)) = state.allocate_script.pop_front() {
            return Err(to_store_error(code));
        }
        let request = state
            .requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("request", request_id))?;
        let n = state.allocations.len() + 1;
        state.allocations.push(Allocation {
            id: format!("alloc-{}", n),
            asset_code: format!("EX-{:02}", n),
            group_id: request.group_id,
            start_date: request.start_date,
            end_date: request.end_date,
            request_id: Some(request.id),
        });
        Ok(())
    }

    async fn score_assets(&self, _request_id: &str) -> StoreResult<Vec<AssetScore>> {
        self.enter("score_assets")?;
        Ok(Vec::new())
    }

    async fn rank_operators(
        &self,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
        _lat: f64,
        _lon: f64,
    ) -> StoreResult<Vec<OperatorMatch>> {
        Ok(self.enter("rank_operators")?.matches.clone())
    }

    async fn off_hire_allocation(&self, allocation_id: &str) -> StoreResult<()> {
        let mut state = self.enter("off_hire_allocation")?;
        let before = state.allocations.len();
        state.allocations.retain(|a| a.id != allocation_id);
        if state.allocations.len() == before {
            return Err(StoreError::not_found("allocation", allocation_id));
        }
        Ok(())
    }

    async fn reassign_allocation(&self, allocation_id: &str) -> StoreResult<CalendarEvent> {
        let mut state = self.enter("reassign_allocation")?;
        let allocation = state
            .allocations
            .iter_mut()
            .find(|a| a.id == allocation_id)
            .ok_or_else(|| StoreError::not_found("allocation", allocation_id))?;
        allocation.asset_code = format!("{}-R", allocation.asset_code);
        Ok(event_for(allocation))
    }

    async fn week_starts(&self) -> StoreResult<Vec<NaiveDate>> {
        let state = self.enter("week_starts")?;
        Ok(week_starts_spanning(
            state.allocations.iter().map(|a| (a.start_date, a.end_date)),
        ))
    }

    async fn query_group_substitutions(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupSubstitution>> {
        let state = self.enter("query_group_substitutions")?;
        Ok(state
            .substitutions
            .get(group_id)
            .map(|subs| {
                subs.iter()
                    .map(|s| GroupSubstitution {
                        group_id: group_id.to_string(),
                        substitute_group_id: s.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_group_required_tickets(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupRequiredTicket>> {
        let state = self.enter("query_group_required_tickets")?;
        Ok(state
            .required_tickets
            .get(group_id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|c| GroupRequiredTicket {
                        group_id: group_id.to_string(),
                        ticket_code: c.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_operator_tickets(&self, operator_id: &str) -> StoreResult<Vec<OperatorTicket>> {
        let state = self.enter("query_operator_tickets")?;
        Ok(state
            .operator_tickets
            .get(operator_id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|c| OperatorTicket {
                        operator_id: operator_id.to_string(),
                        ticket_code: c.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_external_hire(&self, request_id: &str) -> StoreResult<ExternalHire> {
        let mut state = self.enter("create_external_hire")?;
        let contract_id = state
            .requests
            .get(request_id)
            .map(|r| r.contract_id.clone())
            .ok_or_else(|| StoreError::not_found("request", request_id))?;
        let hire = ExternalHire {
            id: format!("ext-{}", state.external_hires.len() + 1),
            contract_id,
            request_id: Some(request_id.to_string()),
        };
        state.external_hires.push(hire.clone());
        Ok(hire)
    }

    async fn update_external_hire(
        &self,
        external_hire_id: &str,
        request_id: Option<&str>,
    ) -> StoreResult<()> {
        let mut state = self.enter("update_external_hire")?;
        let hire = state
            .external_hires
            .iter_mut()
            .find(|h| h.id == external_hire_id)
            .ok_or_else(|| StoreError::not_found("external_hire", external_hire_id))?;
        hire.request_id = request_id.map(str::to_string);
        Ok(())
    }

    async fn cancel_external_hire(&self, external_hire_id: &str) -> StoreResult<()> {
        let mut state = self.enter("cancel_external_hire")?;
        let before = state.external_hires.len();
        state.external_hires.retain(|h| h.id != external_hire_id);
        if state.external_hires.len() == before {
            return Err(StoreError::not_found("external_hire", external_hire_id));
        }
        Ok(())
    }

    async fn create_operator_assignment(
        &self,
        assignment: NewOperatorAssignment,
    ) -> StoreResult<OperatorAssignment> {
        let mut state = self.enter("create_operator_assignment")?;
        let created = OperatorAssignment {
            id: format!("asg-{}", state.assignments.len() + 1),
            request_id: assignment.request_id,
            operator_id: assignment.operator_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
        };
        state.assignments.push(created.clone());
        Ok(created)
    }
}

/// Publisher that keeps every event for later assertions
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<FleetEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<FleetEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl FleetEventPublisher for RecordingPublisher {
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.events.lock().unwrap().push(event);
        Ok(String::new())
    }
}
