// ==========================================
// FleetFlow - Domain layer
// ==========================================
// Entities and value types; no data access, no orchestration
// ==========================================

pub mod access;
pub mod allocation;
pub mod calendar;
pub mod geo;
pub mod group;
pub mod operator;
pub mod request;
pub mod types;

pub use access::AccessContext;
pub use allocation::{sort_asset_scores, Allocation, AssetScore, ExternalHire};
pub use calendar::{CalendarEvent, CalendarFilter, OperatedFilter};
pub use group::{EquipmentGroup, GroupRequiredTicket, GroupSubstitution};
pub use operator::{
    sort_operator_matches, NewOperatorAssignment, OperatorAssignment, OperatorMatch,
    OperatorTicket,
};
pub use request::HireRequest;
pub use types::{AssignmentState, Permission, Role};
