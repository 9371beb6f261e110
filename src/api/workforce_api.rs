// ==========================================
// FleetFlow - Workforce coordinator API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::plant_api::{open_requests, OpenRequest};
use crate::domain::{AccessContext, AssignmentState, OperatorAssignment, OperatorMatch};
use crate::engine::{AssignmentOrchestrator, FailureReport, OptionalEventPublisher};
use crate::store::ResourceStore;
use std::sync::Arc;

pub struct WorkforceApi {
    store: Arc<dyn ResourceStore>,
    events: OptionalEventPublisher,
}

impl WorkforceApi {
    pub fn new(store: Arc<dyn ResourceStore>, events: OptionalEventPublisher) -> Self {
        Self { store, events }
    }

    /// Operated requests with fewer assignments than quantity
    pub async fn list_open_operated_requests(&self) -> ApiResult<Vec<OpenRequest>> {
        let (requests, assignments) = futures::try_join!(
            self.store.list_requests(),
            self.store.list_operator_assignments(),
        )?;

        let operated = requests.into_iter().filter(|r| r.operated).collect();
        Ok(open_requests(
            operated,
            assignments.iter().map(|a| a.request_id.as_str()),
        ))
    }

    /// Start an assignment interaction for one request
    pub async fn open_session(&self, request_id: &str) -> ApiResult<AssignmentSession> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| ApiError::rejected("REQUEST_NOT_FOUND"))?;

        let orchestrator = AssignmentOrchestrator::new(self.store.clone(), request)
            .with_event_publisher(self.events.clone());
        Ok(AssignmentSession { orchestrator })
    }
}

/// Rank-then-assign flow for one request, discarded when the view closes
pub struct AssignmentSession {
    orchestrator: AssignmentOrchestrator<dyn ResourceStore>,
}

impl AssignmentSession {
    pub async fn rank(&mut self, ctx: &AccessContext) -> ApiResult<Vec<OperatorMatch>> {
        Ok(self.orchestrator.rank(ctx).await?)
    }

    pub async fn assign(
        &mut self,
        ctx: &AccessContext,
        operator_id: &str,
    ) -> ApiResult<OperatorAssignment> {
        Ok(self.orchestrator.assign(ctx, operator_id).await?)
    }

    pub fn request_id(&self) -> &str {
        &self.orchestrator.request().id
    }

    pub fn state(&self) -> AssignmentState {
        self.orchestrator.state()
    }

    pub fn matches(&self) -> &[OperatorMatch] {
        self.orchestrator.matches()
    }

    pub fn last_error(&self) -> Option<&FailureReport> {
        self.orchestrator.last_error()
    }
}
