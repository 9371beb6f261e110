// ==========================================
// FleetFlow - Engine layer
// ==========================================
// Orchestration over a ResourceStore: allocation saga, operator
// assignment state machine, eligibility checks, error translation.
// The engine never writes SQL and never re-checks store invariants.
// ==========================================

pub mod allocation;
pub mod assignment;
pub mod eligibility;
pub mod error;
pub mod error_translator;
pub mod events;

#[cfg(test)]
pub(crate) mod test_support;

pub use allocation::{AllocationOrchestrator, AllocationOutcome, AllocationStep};
pub use assignment::AssignmentOrchestrator;
pub use eligibility::EligibilityValidator;
pub use error::{authorize, EngineError, EngineResult, FailureReport};
pub use error_translator::{friendly_error_message, ErrorCode};
pub use events::{
    FleetEvent, FleetEventPublisher, FleetEventType, FleetView, NoOpEventPublisher,
    OptionalEventPublisher,
};
