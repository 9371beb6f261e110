// ==========================================
// FleetFlow - Configuration layer
// ==========================================

pub mod app_config;

pub use app_config::{default_db_path, AppConfig, ConfigError};
