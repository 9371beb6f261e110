// ==========================================
// FleetFlow - External hire management
// ==========================================
// List, re-link (or detach) and cancel externally sourced units
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{AccessContext, ExternalHire, Permission};
use crate::engine::{authorize, FleetEvent, FleetEventType, OptionalEventPublisher};
use crate::store::ResourceStore;
use std::sync::Arc;
use tracing::info;

pub struct ExternalHireApi {
    store: Arc<dyn ResourceStore>,
    events: OptionalEventPublisher,
}

impl ExternalHireApi {
    pub fn new(store: Arc<dyn ResourceStore>, events: OptionalEventPublisher) -> Self {
        Self { store, events }
    }

    pub async fn list(&self) -> ApiResult<Vec<ExternalHire>> {
        Ok(self.store.list_external_hires().await?)
    }

    /// Point an external hire at another request, or detach it with `None`
    pub async fn relink(
        &self,
        ctx: &AccessContext,
        external_hire_id: &str,
        request_id: Option<&str>,
    ) -> ApiResult<()> {
        authorize(ctx, Permission::ManageExternalHires)?;
        self.store
            .update_external_hire(external_hire_id, request_id)
            .await?;
        info!(external_hire_id = %external_hire_id, request_id = ?request_id, "external hire re-linked");
        self.publish(request_id);
        Ok(())
    }

    pub async fn cancel(&self, ctx: &AccessContext, external_hire_id: &str) -> ApiResult<()> {
        authorize(ctx, Permission::ManageExternalHires)?;
        self.store.cancel_external_hire(external_hire_id).await?;
        info!(external_hire_id = %external_hire_id, "external hire cancelled");
        self.publish(None);
        Ok(())
    }

    fn publish(&self, request_id: Option<&str>) {
        self.events.publish(
            FleetEvent::new(
                FleetEventType::ExternalHireChanged,
                request_id.map(str::to_string),
            )
            .with_source("external_hire"),
        );
    }
}
