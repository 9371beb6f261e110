// ==========================================
// FleetFlow - Plant coordinator API
// ==========================================
// Open requests, allocation, asset scoring, off-hire and reassign.
// Errors leave this layer translated (ApiError).
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{AccessContext, AssetScore, CalendarEvent, HireRequest};
use crate::engine::{AllocationOrchestrator, AllocationOutcome, OptionalEventPublisher};
use crate::store::ResourceStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A request that still has unsatisfied units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenRequest {
    #[serde(flatten)]
    pub request: HireRequest,
    pub satisfied: u32,
    pub remaining: u32,
}

/// Keep requests whose satisfied count is below quantity
pub(crate) fn open_requests<'a, I>(
    requests: Vec<HireRequest>,
    satisfied_ids: I,
) -> Vec<OpenRequest>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for id in satisfied_ids {
        *counts.entry(id).or_insert(0) += 1;
    }

    requests
        .into_iter()
        .filter_map(|request| {
            let satisfied = counts.get(request.id.as_str()).copied().unwrap_or(0);
            let remaining = request.remaining(satisfied);
            (remaining > 0).then(|| OpenRequest {
                request,
                satisfied,
                remaining,
            })
        })
        .collect()
}

/// Result of an allocate action plus the banner text for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    #[serde(flatten)]
    pub outcome: AllocationOutcome,
    pub message: String,
}

impl AllocationSummary {
    fn from_outcome(outcome: AllocationOutcome) -> Self {
        let message = match (outcome.internal_count, outcome.external_count) {
            (0, 0) => "Request already fully allocated.".to_string(),
            (_, 0) => "Asset allocated successfully!".to_string(),
            (0, _) => "No internal asset available - external hire created.".to_string(),
            (internal, external) => format!(
                "{} asset(s) allocated, {} external hire(s) created.",
                internal, external
            ),
        };
        Self { outcome, message }
    }
}

pub struct PlantApi {
    store: Arc<dyn ResourceStore>,
    orchestrator: AllocationOrchestrator<dyn ResourceStore>,
}

impl PlantApi {
    pub fn new(store: Arc<dyn ResourceStore>, events: OptionalEventPublisher) -> Self {
        Self {
            orchestrator: AllocationOrchestrator::new(store.clone()).with_event_publisher(events),
            store,
        }
    }

    /// Requests with `allocations + external hires < quantity`
    pub async fn list_open_requests(&self) -> ApiResult<Vec<OpenRequest>> {
        let (requests, allocations, hires) = futures::try_join!(
            self.store.list_requests(),
            self.store.list_allocations(),
            self.store.list_external_hires(),
        )?;

        let satisfied = allocations
            .iter()
            .filter_map(|a| a.request_id.as_deref())
            .chain(hires.iter().filter_map(|h| h.request_id.as_deref()));
        Ok(open_requests(requests, satisfied))
    }

    pub async fn allocate(
        &self,
        ctx: &AccessContext,
        request_id: &str,
    ) -> ApiResult<AllocationSummary> {
        let outcome = self.orchestrator.allocate_request(ctx, request_id).await?;
        Ok(AllocationSummary::from_outcome(outcome))
    }

    pub async fn score_assets(
        &self,
        ctx: &AccessContext,
        request_id: &str,
    ) -> ApiResult<Vec<AssetScore>> {
        Ok(self.orchestrator.score_assets(ctx, request_id).await?)
    }

    pub async fn off_hire(&self, ctx: &AccessContext, allocation_id: &str) -> ApiResult<()> {
        Ok(self.orchestrator.off_hire(ctx, allocation_id).await?)
    }

    pub async fn reassign(
        &self,
        ctx: &AccessContext,
        allocation_id: &str,
    ) -> ApiResult<CalendarEvent> {
        Ok(self.orchestrator.reassign(ctx, allocation_id).await?)
    }
}
