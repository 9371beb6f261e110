// ==========================================
// FleetFlow - View invalidation events
// ==========================================
// Published after a write has been committed so callers can refresh
// cached request / allocation / assignment views.
// The engine defines the trait; the embedding application supplies
// the publisher (or none).
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// Event types
// ==========================================

/// Cached views a caller may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetView {
    Requests,
    Allocations,
    ExternalHires,
    OperatorAssignments,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetEventType {
    /// allocate() committed at least one unit
    AllocationCommitted,
    /// off-hire removed an allocation
    AllocationReleased,
    AllocationReassigned,
    /// external hire re-linked or cancelled
    ExternalHireChanged,
    OperatorAssigned,
}

impl FleetEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FleetEventType::AllocationCommitted => "AllocationCommitted",
            FleetEventType::AllocationReleased => "AllocationReleased",
            FleetEventType::AllocationReassigned => "AllocationReassigned",
            FleetEventType::ExternalHireChanged => "ExternalHireChanged",
            FleetEventType::OperatorAssigned => "OperatorAssigned",
        }
    }

    /// Views made stale by this kind of write
    pub fn invalidated_views(&self) -> Vec<FleetView> {
        match self {
            FleetEventType::AllocationCommitted => vec![
                FleetView::Requests,
                FleetView::Allocations,
                FleetView::ExternalHires,
                FleetView::Calendar,
            ],
            FleetEventType::AllocationReleased | FleetEventType::AllocationReassigned => vec![
                FleetView::Requests,
                FleetView::Allocations,
                FleetView::Calendar,
            ],
            FleetEventType::ExternalHireChanged => {
                vec![FleetView::Requests, FleetView::ExternalHires]
            }
            FleetEventType::OperatorAssigned => vec![
                FleetView::Requests,
                FleetView::OperatorAssignments,
                FleetView::Calendar,
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetEvent {
    pub event_type: FleetEventType,
    /// Request the write belonged to, when known
    pub request_id: Option<String>,
    pub invalidated: Vec<FleetView>,
    pub source: Option<String>,
}

impl FleetEvent {
    pub fn new(event_type: FleetEventType, request_id: Option<String>) -> Self {
        Self {
            event_type,
            request_id,
            invalidated: event_type.invalidated_views(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn invalidates(&self, view: FleetView) -> bool {
        self.invalidated.contains(&view)
    }
}

// ==========================================
// Publisher trait
// ==========================================

pub trait FleetEventPublisher: Send + Sync {
    /// # Returns
    /// - `Ok(id)`: delivery id if the publisher has one, else empty
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl FleetEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(event_type = event.event_type.as_str(), "no-op publisher: event dropped");
        Ok(String::new())
    }
}

/// `Option<Arc<dyn FleetEventPublisher>>` with a publish that never fails the caller
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn FleetEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn FleetEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// Publish if configured. Delivery errors are logged, not returned:
    /// the write they describe is already committed.
    pub fn publish(&self, event: FleetEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        let event_type = event.event_type.as_str();
        if let Err(e) = publisher.publish(event) {
            tracing::warn!(event_type, error = %e, "failed to publish fleet event");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}
