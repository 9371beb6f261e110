// ==========================================
// FleetFlow - Assignment orchestrator
// ==========================================
// Per-request state machine:
//   Idle -> Ranking -> Ranked -> Assigning -> Assigned | Failed
// Ranking may restart from Ranked or Failed. Assigning may restart
// from Failed while the last ranked matches are still held.
// Rejected calls (role, illegal transition) leave the state untouched.
// ==========================================

use crate::domain::{
    sort_operator_matches, AccessContext, AssignmentState, HireRequest, NewOperatorAssignment,
    OperatorAssignment, OperatorMatch, Permission,
};
use crate::engine::eligibility::EligibilityValidator;
use crate::engine::error::{authorize, EngineError, EngineResult, FailureReport};
use crate::engine::events::{FleetEvent, FleetEventType, OptionalEventPublisher};
use crate::store::ResourceStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One coordinator interaction with one hire request.
///
/// Matches and the last failure are working state for this interaction
/// only; nothing here is shared between requests.
pub struct AssignmentOrchestrator<S>
where
    S: ResourceStore + ?Sized,
{
    store: Arc<S>,
    validator: EligibilityValidator<S>,
    events: OptionalEventPublisher,
    request: HireRequest,
    state: AssignmentState,
    matches: Vec<OperatorMatch>,
    last_error: Option<FailureReport>,
}

impl<S> AssignmentOrchestrator<S>
where
    S: ResourceStore + ?Sized,
{
    pub fn new(store: Arc<S>, request: HireRequest) -> Self {
        Self {
            validator: EligibilityValidator::new(store.clone()),
            store,
            events: OptionalEventPublisher::none(),
            request,
            state: AssignmentState::Idle,
            matches: Vec::new(),
            last_error: None,
        }
    }

    pub fn with_event_publisher(mut self, events: OptionalEventPublisher) -> Self {
        self.events = events;
        self
    }

    pub fn state(&self) -> AssignmentState {
        self.state
    }

    pub fn request(&self) -> &HireRequest {
        &self.request
    }

    /// Candidates from the last successful ranking, nearest first
    pub fn matches(&self) -> &[OperatorMatch] {
        &self.matches
    }

    pub fn last_error(&self) -> Option<&FailureReport> {
        self.last_error.as_ref()
    }

    // ==========================================
    // rank
    // ==========================================

    /// Rank operators for the request's date range and site.
    ///
    /// Assignability (operated, assignments < quantity) is recomputed
    /// from a fresh request/assignment snapshot on every call.
    #[instrument(skip(self, ctx), fields(request_id = %self.request.id, user = %ctx.user_id))]
    pub async fn rank(&mut self, ctx: &AccessContext) -> EngineResult<Vec<OperatorMatch>> {
        authorize(ctx, Permission::RankOperators)?;
        if !self.state.can_start_ranking() {
            return Err(EngineError::InvalidStateTransition {
                from: self.state,
                to: AssignmentState::Ranking,
            });
        }

        self.transition(AssignmentState::Ranking);
        self.last_error = None;

        match self.fetch_ranking().await {
            Ok(mut matches) => {
                sort_operator_matches(&mut matches);
                info!(count = matches.len(), "operators ranked");
                self.matches = matches.clone();
                self.transition(AssignmentState::Ranked);
                Ok(matches)
            }
            Err(err) => {
                // stale candidates must not be assignable after a failed rank
                self.matches.clear();
                Err(self.fail(err))
            }
        }
    }

    async fn fetch_ranking(&mut self) -> EngineResult<Vec<OperatorMatch>> {
        let request = self
            .store
            .get_request(&self.request.id)
            .await?
            .ok_or_else(|| EngineError::RequestNotFound(self.request.id.clone()))?;
        self.request = request;

        if !self.request.operated {
            return Err(EngineError::RequestNotAssignable(self.request.id.clone()));
        }
        let assigned = self
            .store
            .list_assignments_for_request(&self.request.id)
            .await?
            .len() as u32;
        if assigned >= self.request.quantity {
            debug!(assigned, quantity = self.request.quantity, "request fully assigned");
            return Err(EngineError::RequestNotAssignable(self.request.id.clone()));
        }
        if !self.request.has_valid_date_range() {
            return Err(EngineError::InvalidDateRange(self.request.id.clone()));
        }

        let matches = self
            .store
            .rank_operators(
                self.request.start_date,
                self.request.end_date,
                self.request.site_lat,
                self.request.site_lon,
            )
            .await?;
        Ok(matches)
    }

    // ==========================================
    // assign
    // ==========================================

    /// Validate eligibility, then commit one assignment row.
    ///
    /// The row carries the request's dates unchanged. Ineligible
    /// operators never reach the store, and neither does an assign
    /// against a request that is already fully assigned.
    #[instrument(skip(self, ctx), fields(request_id = %self.request.id, user = %ctx.user_id))]
    pub async fn assign(
        &mut self,
        ctx: &AccessContext,
        operator_id: &str,
    ) -> EngineResult<OperatorAssignment> {
        authorize(ctx, Permission::AssignOperators)?;
        let can_assign = match self.state {
            AssignmentState::Ranked => true,
            AssignmentState::Failed => !self.matches.is_empty(),
            _ => false,
        };
        if !can_assign {
            return Err(EngineError::InvalidStateTransition {
                from: self.state,
                to: AssignmentState::Assigning,
            });
        }

        self.transition(AssignmentState::Assigning);
        self.last_error = None;

        if let Err(err) = self
            .validator
            .check_operator_eligibility(&self.request.group_id, operator_id)
            .await
        {
            return Err(self.fail(err));
        }

        // another session may have filled the request since ranking
        let assigned = match self.store.list_assignments_for_request(&self.request.id).await {
            Ok(rows) => rows.len() as u32,
            Err(err) => return Err(self.fail(err.into())),
        };
        if assigned >= self.request.quantity {
            debug!(assigned, quantity = self.request.quantity, "request filled before assign");
            self.matches.clear();
            return Err(self.fail(EngineError::RequestNotAssignable(self.request.id.clone())));
        }

        let new_assignment = NewOperatorAssignment {
            request_id: self.request.id.clone(),
            operator_id: operator_id.to_string(),
            start_date: self.request.start_date,
            end_date: self.request.end_date,
        };
        match self.store.create_operator_assignment(new_assignment).await {
            Ok(assignment) => {
                info!(operator_id = %operator_id, assignment_id = %assignment.id, "operator assigned");
                self.transition(AssignmentState::Assigned);
                self.events.publish(
                    FleetEvent::new(FleetEventType::OperatorAssigned, Some(self.request.id.clone()))
                        .with_source("assignment"),
                );
                Ok(assignment)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    // ===== internals =====

    fn transition(&mut self, to: AssignmentState) {
        debug!(from = ?self.state, to = ?to, "assignment state");
        self.state = to;
    }

    fn fail(&mut self, err: EngineError) -> EngineError {
        let report = FailureReport::from(&err);
        warn!(code = %report.code, "assignment step failed");
        self.last_error = Some(report);
        self.transition(AssignmentState::Failed);
        err
    }
}
