// ==========================================
// Integration test helpers
// ==========================================
// Temp-file SQLite store plus small seeding helpers
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use fleet_flow::domain::{AccessContext, EquipmentGroup, HireRequest, OperatorTicket, Role};
use fleet_flow::store::SqliteResourceStore;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Harbour Tunnel site used by most requests
pub const SITE: (f64, f64) = (-33.86, 151.21);

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Fresh store on a temp file (keep the NamedTempFile alive)
pub fn create_test_store() -> (NamedTempFile, Arc<SqliteResourceStore>) {
    fleet_flow::logging::init_test();
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let store = SqliteResourceStore::open(&db_path, 1_000).unwrap();
    (temp_file, Arc::new(store))
}

pub fn plant() -> AccessContext {
    AccessContext::new("u-plant", Role::PlantCoordinator)
}

pub fn workforce() -> AccessContext {
    AccessContext::new("u-wf", Role::WorkforceCoordinator)
}

pub fn seed_group(store: &SqliteResourceStore, id: &str, name: &str) {
    store
        .insert_equipment_group(&EquipmentGroup {
            id: id.to_string(),
            name: name.to_string(),
        })
        .unwrap();
}

pub fn seed_contract(store: &SqliteResourceStore, id: &str, site: &str, status: &str) {
    store
        .insert_contract(id, Some(id), Some(site), Some(status))
        .unwrap();
}

pub fn seed_operator(
    store: &SqliteResourceStore,
    id: &str,
    name: &str,
    home: Option<(f64, f64)>,
    tickets: &[&str],
) {
    store.insert_operator(id, name, home).unwrap();
    for ticket in tickets {
        store
            .insert_operator_ticket(&OperatorTicket {
                operator_id: id.to_string(),
                ticket_code: ticket.to_string(),
            })
            .unwrap();
    }
}

/// Request at SITE on contract `c1`
pub fn request(
    id: &str,
    group_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    quantity: u32,
    operated: bool,
) -> HireRequest {
    HireRequest {
        id: id.to_string(),
        contract_id: "c1".to_string(),
        group_id: group_id.to_string(),
        start_date: start,
        end_date: end,
        quantity,
        operated,
        site_lat: SITE.0,
        site_lon: SITE.1,
    }
}

/// Group `g1` (Excavators), contract `c1` and two assets:
/// EX-NEAR about 1.4 km from SITE, EX-FAR about 26 km away
pub fn seed_fleet(store: &SqliteResourceStore) {
    seed_group(store, "g1", "Excavators");
    seed_contract(store, "c1", "Harbour Tunnel", "active");
    store
        .insert_asset("EX-NEAR", "g1", Some((-33.87, 151.20)))
        .unwrap();
    store
        .insert_asset("EX-FAR", "g1", Some((-33.70, 151.00)))
        .unwrap();
}
