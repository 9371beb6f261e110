// ==========================================
// FleetFlow - plant-hire allocation and assignment engine
// ==========================================
// Layers:
//   domain  entities and value types
//   store   ResourceStore contract + SQLite reference store
//   engine  allocation saga, assignment state machine, eligibility
//   api     coordinator facades with translated errors
//   config  AppConfig (file + env)
// ==========================================

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod store;

pub use domain::{
    AccessContext, Allocation, AssetScore, AssignmentState, CalendarEvent, ExternalHire,
    HireRequest, OperatorAssignment, OperatorMatch, Role,
};
pub use engine::{
    AllocationOrchestrator, AllocationOutcome, AssignmentOrchestrator, EligibilityValidator,
    EngineError,
};
pub use store::{ResourceStore, SqliteResourceStore, StoreError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "FleetFlow";
