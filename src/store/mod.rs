// ==========================================
// FleetFlow - Store layer
// ==========================================
// ResourceStore: async contract the engine depends on
// SqliteResourceStore: rusqlite reference implementation
// ==========================================

pub mod error;
pub mod resource_store;
pub mod sqlite_store;

pub use error::{looks_like_error_code, StoreError, StoreResult};
pub use resource_store::ResourceStore;
pub use sqlite_store::SqliteResourceStore;
