// ==========================================
// FleetFlow - Allocation orchestrator
// ==========================================
// Drives one hire request through one allocate attempt per remaining
// unit, strictly in sequence:
// - success                    -> internal unit
// - NO_INTERNAL_ASSET_AVAILABLE -> substitution check, then external hire
// - anything else              -> abort
// Committed units are never compensated. A partial run is a normal
// outcome, visible in the store and in the published event.
// ==========================================

use crate::domain::{
    AccessContext, AssetScore, CalendarEvent, GroupSubstitution, HireRequest, Permission,
};
use crate::engine::eligibility::EligibilityValidator;
use crate::engine::error::{authorize, EngineError, EngineResult};
use crate::engine::error_translator::ErrorCode;
use crate::engine::events::{FleetEvent, FleetEventType, OptionalEventPublisher};
use crate::store::ResourceStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// Outcome
// ==========================================

/// One committed unit of the allocation saga
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationStep {
    Internal { unit: u32 },
    External { unit: u32, external_hire_id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub internal_count: u32,
    pub external_count: u32,
    /// Committed steps in execution order
    pub steps: Vec<AllocationStep>,
    /// Substitute groups surfaced by failed internal attempts (deduplicated).
    /// Informational only; nothing is re-allocated against them.
    pub substitutions: Vec<GroupSubstitution>,
}

impl AllocationOutcome {
    pub fn total(&self) -> u32 {
        self.internal_count + self.external_count
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn record_internal(&mut self, unit: u32) {
        self.internal_count += 1;
        self.steps.push(AllocationStep::Internal { unit });
    }

    fn record_external(&mut self, unit: u32, external_hire_id: String) {
        self.external_count += 1;
        self.steps.push(AllocationStep::External {
            unit,
            external_hire_id,
        });
    }

    fn note_substitutions(&mut self, found: Vec<GroupSubstitution>) {
        for sub in found {
            if !self.substitutions.contains(&sub) {
                self.substitutions.push(sub);
            }
        }
    }
}

// ==========================================
// AllocationOrchestrator
// ==========================================

pub struct AllocationOrchestrator<S>
where
    S: ResourceStore + ?Sized,
{
    store: Arc<S>,
    validator: EligibilityValidator<S>,
    events: OptionalEventPublisher,
}

impl<S> AllocationOrchestrator<S>
where
    S: ResourceStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            validator: EligibilityValidator::new(store.clone()),
            store,
            events: OptionalEventPublisher::none(),
        }
    }

    pub fn with_event_publisher(mut self, events: OptionalEventPublisher) -> Self {
        self.events = events;
        self
    }

    /// Units already satisfied for a request (allocations + external hires)
    pub async fn existing_count(&self, request_id: &str) -> EngineResult<u32> {
        let allocations = self.store.list_allocations_for_request(request_id).await?;
        let hires = self.store.list_external_hires_for_request(request_id).await?;
        Ok((allocations.len() + hires.len()) as u32)
    }

    /// Satisfy `quantity - existing_count` units of `request`.
    ///
    /// # Returns
    /// - `Ok(outcome)`: every remaining unit attempted; `{0,0}` when nothing remains
    /// - `Err`: first unrecoverable failure. Units committed before it stay committed.
    #[instrument(skip(self, ctx, request), fields(request_id = %request.id, user = %ctx.user_id))]
    pub async fn allocate(
        &self,
        ctx: &AccessContext,
        request: &HireRequest,
        existing_count: u32,
    ) -> EngineResult<AllocationOutcome> {
        authorize(ctx, Permission::AllocateAssets)?;
        if !request.has_valid_date_range() {
            return Err(EngineError::InvalidDateRange(request.id.clone()));
        }

        let remaining = request.remaining(existing_count);
        let mut outcome = AllocationOutcome::default();
        if remaining == 0 {
            debug!("request already satisfied");
            return Ok(outcome);
        }

        for unit in 1..=remaining {
            match self.store.allocate_best_asset(&request.id).await {
                Ok(()) => {
                    debug!(unit, "internal asset allocated");
                    outcome.record_internal(unit);
                }
                Err(err) if err.is_rejection(ErrorCode::NoInternalAssetAvailable.as_str()) => {
                    if let Err(e) = self.external_fallback(request, unit, &mut outcome).await {
                        return Err(self.abort(request, &outcome, e));
                    }
                }
                Err(err) => return Err(self.abort(request, &outcome, err.into())),
            }
        }

        info!(
            internal = outcome.internal_count,
            external = outcome.external_count,
            substitutes = outcome.substitutions.len(),
            "allocation finished"
        );
        self.publish(FleetEventType::AllocationCommitted, Some(&request.id));
        Ok(outcome)
    }

    /// Load the request and its satisfied count, then `allocate`
    pub async fn allocate_request(
        &self,
        ctx: &AccessContext,
        request_id: &str,
    ) -> EngineResult<AllocationOutcome> {
        authorize(ctx, Permission::AllocateAssets)?;
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| EngineError::RequestNotFound(request_id.to_string()))?;
        let existing = self.existing_count(request_id).await?;
        self.allocate(ctx, &request, existing).await
    }

    /// Ranked internal assets for a request, best first
    pub async fn score_assets(
        &self,
        ctx: &AccessContext,
        request_id: &str,
    ) -> EngineResult<Vec<AssetScore>> {
        authorize(ctx, Permission::AllocateAssets)?;
        let mut scores = self.store.score_assets(request_id).await?;
        crate::domain::sort_asset_scores(&mut scores);
        Ok(scores)
    }

    #[instrument(skip(self, ctx), fields(user = %ctx.user_id))]
    pub async fn off_hire(&self, ctx: &AccessContext, allocation_id: &str) -> EngineResult<()> {
        authorize(ctx, Permission::AllocateAssets)?;
        self.store.off_hire_allocation(allocation_id).await?;
        info!("allocation off-hired");
        self.publish(FleetEventType::AllocationReleased, None);
        Ok(())
    }

    /// Move an allocation onto another free asset; `ALLOCATION_OVERLAP` when none fits
    #[instrument(skip(self, ctx), fields(user = %ctx.user_id))]
    pub async fn reassign(
        &self,
        ctx: &AccessContext,
        allocation_id: &str,
    ) -> EngineResult<CalendarEvent> {
        authorize(ctx, Permission::AllocateAssets)?;
        let event = self.store.reassign_allocation(allocation_id).await?;
        info!(asset_code = ?event.asset_code, "allocation reassigned");
        self.publish(FleetEventType::AllocationReassigned, None);
        Ok(event)
    }

    // ===== internals =====

    async fn external_fallback(
        &self,
        request: &HireRequest,
        unit: u32,
        outcome: &mut AllocationOutcome,
    ) -> EngineResult<()> {
        let substitutes = self.validator.check_substitution(&request.group_id).await?;
        if !substitutes.is_empty() {
            debug!(unit, count = substitutes.len(), "substitute groups available");
        }
        outcome.note_substitutions(substitutes);

        let hire = self.store.create_external_hire(&request.id).await?;
        debug!(unit, external_hire_id = %hire.id, "unit sourced externally");
        outcome.record_external(unit, hire.id);
        Ok(())
    }

    fn abort(
        &self,
        request: &HireRequest,
        outcome: &AllocationOutcome,
        err: EngineError,
    ) -> EngineError {
        warn!(
            code = %err.code(),
            committed = outcome.steps.len(),
            "allocation aborted"
        );
        if !outcome.is_empty() {
            self.publish(FleetEventType::AllocationCommitted, Some(&request.id));
        }
        err
    }

    fn publish(&self, event_type: FleetEventType, request_id: Option<&str>) {
        self.events.publish(
            FleetEvent::new(event_type, request_id.map(str::to_string)).with_source("allocation"),
        );
    }
}
