// ==========================================
// FleetFlow - Application state
// ==========================================
// Opens the store once and wires every API facade onto it
// ==========================================

use crate::api::{CalendarApi, ExternalHireApi, PlantApi, WorkforceApi};
use crate::config::AppConfig;
use crate::engine::{FleetEventPublisher, OptionalEventPublisher};
use crate::store::{ResourceStore, SqliteResourceStore, StoreResult};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ResourceStore>,
    pub plant_api: Arc<PlantApi>,
    pub workforce_api: Arc<WorkforceApi>,
    pub external_hire_api: Arc<ExternalHireApi>,
    pub calendar_api: Arc<CalendarApi>,
}

impl AppState {
    /// Open (creating if needed) the configured database
    pub fn open(
        config: AppConfig,
        publisher: Option<Arc<dyn FleetEventPublisher>>,
    ) -> StoreResult<Self> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(anyhow::Error::from)?;
            }
        }

        let store = SqliteResourceStore::open(&config.db_path, config.busy_timeout_ms)?
            .with_operator_search_radius(config.operator_search_radius_km);
        info!(db_path = %config.db_path, "application state ready");
        Ok(Self::with_store(config, Arc::new(store), publisher))
    }

    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn ResourceStore>,
        publisher: Option<Arc<dyn FleetEventPublisher>>,
    ) -> Self {
        let events = match publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };

        Self {
            plant_api: Arc::new(PlantApi::new(store.clone(), events.clone())),
            workforce_api: Arc::new(WorkforceApi::new(store.clone(), events.clone())),
            external_hire_api: Arc::new(ExternalHireApi::new(store.clone(), events)),
            calendar_api: Arc::new(CalendarApi::new(store.clone())),
            store,
            config,
        }
    }
}
