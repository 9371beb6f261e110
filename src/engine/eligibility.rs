// ==========================================
// FleetFlow - Eligibility validator
// ==========================================
// Read-only pre-commit checks:
// - substitute equipment groups for a group
// - operator tickets against a group's required tickets
// Nothing here writes to the store.
// ==========================================

use crate::domain::GroupSubstitution;
use crate::engine::error::{EngineError, EngineResult};
use crate::store::ResourceStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct EligibilityValidator<S>
where
    S: ResourceStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> EligibilityValidator<S>
where
    S: ResourceStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Substitute groups usable in place of `group_id` (empty = none).
    ///
    /// Query failures propagate.
    #[instrument(skip(self))]
    pub async fn check_substitution(&self, group_id: &str) -> EngineResult<Vec<GroupSubstitution>> {
        let substitutions = self.store.query_group_substitutions(group_id).await?;
        debug!(count = substitutions.len(), "substitution check");
        Ok(substitutions)
    }

    /// Fails with `MISSING_REQUIRED_TICKETS` unless the operator holds
    /// every ticket the group requires.
    ///
    /// A group with no requirements is accepted without querying the
    /// operator's tickets.
    #[instrument(skip(self))]
    pub async fn check_operator_eligibility(
        &self,
        group_id: &str,
        operator_id: &str,
    ) -> EngineResult<()> {
        let required: BTreeSet<String> = self
            .store
            .query_group_required_tickets(group_id)
            .await?
            .into_iter()
            .map(|t| t.ticket_code)
            .collect();

        if required.is_empty() {
            return Ok(());
        }

        let held: BTreeSet<String> = self
            .store
            .query_operator_tickets(operator_id)
            .await?
            .into_iter()
            .map(|t| t.ticket_code)
            .collect();

        let missing: Vec<String> = required.difference(&held).cloned().collect();
        if missing.is_empty() {
            Ok(())
        } else {
            debug!(missing = ?missing, "operator not eligible");
            Err(EngineError::MissingRequiredTickets {
                group_id: group_id.to_string(),
                operator_id: operator_id.to_string(),
                missing,
            })
        }
    }
}
