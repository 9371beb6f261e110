// ==========================================
// FleetFlow - Resource store contract
// ==========================================
// The store owns every persisted entity and is the only serialization
// point: overlap and date-order invariants are enforced there, never
// re-checked by the engine.
// ==========================================

use crate::domain::{
    Allocation, AssetScore, CalendarEvent, ExternalHire, GroupRequiredTicket, GroupSubstitution,
    HireRequest, NewOperatorAssignment, OperatorAssignment, OperatorMatch, OperatorTicket,
};
use crate::store::error::StoreResult;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ResourceStore: Send + Sync {
    // ===== Snapshots =====

    async fn get_request(&self, request_id: &str) -> StoreResult<Option<HireRequest>>;

    async fn list_requests(&self) -> StoreResult<Vec<HireRequest>>;

    async fn list_allocations(&self) -> StoreResult<Vec<Allocation>>;

    async fn list_allocations_for_request(&self, request_id: &str) -> StoreResult<Vec<Allocation>>;

    async fn list_external_hires(&self) -> StoreResult<Vec<ExternalHire>>;

    async fn list_external_hires_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<ExternalHire>>;

    async fn list_operator_assignments(&self) -> StoreResult<Vec<OperatorAssignment>>;

    async fn list_assignments_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<OperatorAssignment>>;

    async fn list_calendar_events(&self) -> StoreResult<Vec<CalendarEvent>>;

    // ===== Remote procedures =====

    /// Binds one free asset to one unit of the request.
    ///
    /// Fails with `NO_INTERNAL_ASSET_AVAILABLE` when no asset of the
    /// group is free over the request range.
    async fn allocate_best_asset(&self, request_id: &str) -> StoreResult<()>;

    async fn score_assets(&self, request_id: &str) -> StoreResult<Vec<AssetScore>>;

    async fn rank_operators(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        lat: f64,
        lon: f64,
    ) -> StoreResult<Vec<OperatorMatch>>;

    async fn off_hire_allocation(&self, allocation_id: &str) -> StoreResult<()>;

    /// Moves an allocation to another asset; `ALLOCATION_OVERLAP` if the
    /// replacement conflicts
    async fn reassign_allocation(&self, allocation_id: &str) -> StoreResult<CalendarEvent>;

    async fn week_starts(&self) -> StoreResult<Vec<NaiveDate>>;

    // ===== Eligibility lookups =====

    async fn query_group_substitutions(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupSubstitution>>;

    async fn query_group_required_tickets(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupRequiredTicket>>;

    async fn query_operator_tickets(&self, operator_id: &str) -> StoreResult<Vec<OperatorTicket>>;

    // ===== Row creation / maintenance =====

    async fn create_external_hire(&self, request_id: &str) -> StoreResult<ExternalHire>;

    /// Re-links (or detaches, with `None`) an external hire
    async fn update_external_hire(
        &self,
        external_hire_id: &str,
        request_id: Option<&str>,
    ) -> StoreResult<()>;

    async fn cancel_external_hire(&self, external_hire_id: &str) -> StoreResult<()>;

    /// Single atomic row insert; `ASSIGNMENT_OVERLAP` on conflict
    async fn create_operator_assignment(
        &self,
        assignment: NewOperatorAssignment,
    ) -> StoreResult<OperatorAssignment>;
}
