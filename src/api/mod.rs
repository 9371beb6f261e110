// ==========================================
// FleetFlow - API layer
// ==========================================
// Coordinator-facing facades over the engine; every error is
// returned as a translated ApiError
// ==========================================

pub mod calendar_api;
pub mod error;
pub mod external_hire_api;
pub mod plant_api;
pub mod workforce_api;

pub use calendar_api::{CalendarApi, WeekView};
pub use error::{ApiError, ApiResult};
pub use external_hire_api::ExternalHireApi;
pub use plant_api::{AllocationSummary, OpenRequest, PlantApi};
pub use workforce_api::{AssignmentSession, WorkforceApi};
