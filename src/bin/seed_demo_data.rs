// Dev utility: reset a database and seed a small plant-hire scenario.
//
// Usage:
//   cargo run --bin seed_demo_data -- [db_path]
//
// An existing file is backed up to <db_path>.bak.<timestamp> first.
// Requests start next Monday so the calendar always has something to show.

use chrono::{Datelike, Duration, Local, NaiveDate};
use fleet_flow::config::default_db_path;
use fleet_flow::db::open_sqlite_connection;
use fleet_flow::domain::{
    EquipmentGroup, GroupRequiredTicket, GroupSubstitution, HireRequest, OperatorTicket,
};
use fleet_flow::store::SqliteResourceStore;
use std::error::Error;
use std::fs;
use std::path::Path;

const SITES: [(&str, &str, f64, f64); 3] = [
    ("c-north", "North Quarry", -33.75, 151.05),
    ("c-harbour", "Harbour Tunnel", -33.86, 151.21),
    ("c-west", "Western Depot", -33.81, 150.90),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);

    backup_and_reset_db(&db_path)?;
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteResourceStore::open(&db_path, fleet_flow::db::DEFAULT_BUSY_TIMEOUT_MS)?;
    seed(&store)?;
    print_quick_counts(&db_path)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn next_monday(today: NaiveDate) -> NaiveDate {
    let offset = 7 - today.weekday().num_days_from_monday() as i64;
    today + Duration::days(offset)
}

fn seed(store: &SqliteResourceStore) -> Result<(), Box<dyn Error>> {
    let groups = [
        ("g-exc-20t", "20t Excavator"),
        ("g-exc-30t", "30t Excavator"),
        ("g-roller", "Smooth Drum Roller"),
    ];
    for (id, name) in groups {
        store.insert_equipment_group(&EquipmentGroup {
            id: id.to_string(),
            name: name.to_string(),
        })?;
    }
    store.insert_group_substitution(&GroupSubstitution {
        group_id: "g-exc-20t".to_string(),
        substitute_group_id: "g-exc-30t".to_string(),
    })?;
    let required = [
        ("g-exc-20t", "HR-EXC"),
        ("g-exc-30t", "HR-EXC"),
        ("g-exc-30t", "WAH"),
    ];
    for (group_id, ticket) in required {
        store.insert_group_required_ticket(&GroupRequiredTicket {
            group_id: group_id.to_string(),
            ticket_code: ticket.to_string(),
        })?;
    }

    for (id, site, _, _) in SITES {
        store.insert_contract(id, Some(id.to_uppercase().as_str()), Some(site), Some("active"))?;
    }

    let assets = [
        ("EX20-01", "g-exc-20t", Some((-33.80, 151.00))),
        ("EX20-02", "g-exc-20t", Some((-33.90, 151.20))),
        ("EX30-01", "g-exc-30t", Some((-33.70, 151.10))),
        ("EX30-02", "g-exc-30t", None),
        ("RL-01", "g-roller", Some((-33.85, 150.95))),
    ];
    for (code, group, home) in assets {
        store.insert_asset(code, group, home)?;
    }

    let operators = [
        ("op-ana", "Ana Silva", Some((-33.78, 151.02)), &["HR-EXC", "WAH"][..]),
        ("op-ben", "Ben Okafor", Some((-33.88, 151.18)), &["HR-EXC"][..]),
        ("op-chen", "Chen Wei", None, &[][..]),
        ("op-dana", "Dana Kowalski", Some((-33.95, 150.85)), &["HR-EXC", "WAH"][..]),
    ];
    for (id, name, home, tickets) in operators {
        store.insert_operator(id, name, home)?;
        for ticket in tickets {
            store.insert_operator_ticket(&OperatorTicket {
                operator_id: id.to_string(),
                ticket_code: ticket.to_string(),
            })?;
        }
    }

    let monday = next_monday(Local::now().date_naive());
    store.insert_operator_unavailability("op-dana", monday, monday + Duration::days(2))?;

    let requests = [
        ("req-001", 0, "g-exc-20t", 0, 4, 2, true),
        ("req-002", 1, "g-exc-20t", 2, 6, 2, false),
        ("req-003", 2, "g-roller", 7, 11, 1, true),
        ("req-004", 1, "g-exc-30t", 7, 9, 1, true),
    ];
    for (id, site_idx, group, from, to, quantity, operated) in requests {
        let (contract_id, _, lat, lon) = SITES[site_idx];
        store.insert_request(&HireRequest {
            id: id.to_string(),
            contract_id: contract_id.to_string(),
            group_id: group.to_string(),
            start_date: monday + Duration::days(from),
            end_date: monday + Duration::days(to),
            quantity,
            operated,
            site_lat: lat,
            site_lon: lon,
        })?;
    }

    eprintln!("Seeded scenario starting {}", monday);
    Ok(())
}

fn print_quick_counts(db_path: &str) -> Result<(), Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    let tables = [
        "equipment_groups",
        "contracts",
        "assets",
        "operators",
        "operator_tickets",
        "group_required_tickets",
        "group_substitutions",
        "hire_requests",
    ];

    eprintln!("Row counts:");
    for t in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", t);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        eprintln!("  {:<24} {}", t, count);
    }
    Ok(())
}
