// ==========================================
// FleetFlow - SQLite resource store
// ==========================================
// Reference implementation of `ResourceStore` on rusqlite.
// Dates bind as YYYY-MM-DD text through rusqlite's chrono support.
// Allocation procedures run inside a transaction so the quantity
// ceiling and asset choice are evaluated against one snapshot.
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection_with_timeout};
use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use crate::domain::calendar::week_starts_spanning;
use crate::domain::geo::distance_from;
use crate::domain::{
    sort_asset_scores, sort_operator_matches, Allocation, AssetScore, CalendarEvent,
    EquipmentGroup, ExternalHire, GroupRequiredTicket, GroupSubstitution, HireRequest,
    NewOperatorAssignment, OperatorAssignment, OperatorMatch, OperatorTicket,
};
use crate::store::error::{StoreError, StoreResult};
use crate::store::resource_store::ResourceStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, contract_id, group_id, start_date, end_date, quantity, operated, site_lat, site_lon";
const ALLOCATION_COLUMNS: &str = "id, asset_code, group_id, start_date, end_date, request_id";
const ASSIGNMENT_COLUMNS: &str = "id, request_id, operator_id, start_date, end_date";

const CALENDAR_EVENT_QUERY: &str = r#"
    SELECT
        a.id, a.start_date, a.asset_code, COALESCE(g.name, a.group_id),
        c.site, c.status, r.operated,
        (SELECT o.name
           FROM operator_assignments oa
           JOIN operators o ON o.id = oa.operator_id
          WHERE oa.request_id = a.request_id
          ORDER BY oa.start_date, oa.id
          LIMIT 1)
    FROM allocations a
    LEFT JOIN equipment_groups g ON g.id = a.group_id
    LEFT JOIN hire_requests r ON r.id = a.request_id
    LEFT JOIN contracts c ON c.id = r.contract_id
"#;

// ==========================================
// SqliteResourceStore
// ==========================================

pub struct SqliteResourceStore {
    conn: Arc<Mutex<Connection>>,
    operator_search_radius_km: Option<f64>,
}

impl SqliteResourceStore {
    /// Open (or create) a database file and bootstrap the schema
    pub fn open(db_path: &str, busy_timeout_ms: u64) -> StoreResult<Self> {
        let conn = open_sqlite_connection_with_timeout(db_path, busy_timeout_ms)?;
        init_schema(&conn)?;
        info!(db_path = %db_path, "resource store opened");
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn, DEFAULT_BUSY_TIMEOUT_MS)?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Wrap an existing connection (schema assumed present)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            operator_search_radius_km: None,
        }
    }

    /// Drop ranked operators farther than `radius_km` (unknown distances are kept)
    pub fn with_operator_search_radius(mut self, radius_km: Option<f64>) -> Self {
        self.operator_search_radius_km = radius_km;
        self
    }

    fn get_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }

    // ==========================================
    // Reference data (contract intake, fleet and workforce registers)
    // ==========================================

    pub fn insert_equipment_group(&self, group: &EquipmentGroup) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO equipment_groups (id, name) VALUES (?1, ?2)",
            params![group.id, group.name],
        )?;
        Ok(())
    }

    pub fn insert_contract(
        &self,
        id: &str,
        code: Option<&str>,
        site: Option<&str>,
        status: Option<&str>,
    ) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO contracts (id, code, site, status) VALUES (?1, ?2, ?3, ?4)",
            params![id, code, site, status],
        )?;
        Ok(())
    }

    pub fn insert_asset(
        &self,
        asset_code: &str,
        group_id: &str,
        home: Option<(f64, f64)>,
    ) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO assets (asset_code, group_id, home_lat, home_lon) VALUES (?1, ?2, ?3, ?4)",
            params![asset_code, group_id, home.map(|h| h.0), home.map(|h| h.1)],
        )?;
        Ok(())
    }

    pub fn insert_request(&self, request: &HireRequest) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO hire_requests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                REQUEST_COLUMNS
            ),
            params![
                request.id,
                request.contract_id,
                request.group_id,
                request.start_date,
                request.end_date,
                request.quantity,
                request.operated,
                request.site_lat,
                request.site_lon,
            ],
        )?;
        Ok(())
    }

    pub fn insert_operator(&self, id: &str, name: &str, home: Option<(f64, f64)>) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO operators (id, name, home_lat, home_lon) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, home.map(|h| h.0), home.map(|h| h.1)],
        )?;
        Ok(())
    }

    pub fn insert_operator_unavailability(
        &self,
        operator_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO operator_unavailability (id, operator_id, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![Uuid::new_v4().to_string(), operator_id, start_date, end_date],
        )?;
        Ok(())
    }

    pub fn insert_operator_ticket(&self, ticket: &OperatorTicket) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO operator_tickets (operator_id, ticket_code) VALUES (?1, ?2)",
            params![ticket.operator_id, ticket.ticket_code],
        )?;
        Ok(())
    }

    pub fn insert_group_required_ticket(&self, ticket: &GroupRequiredTicket) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO group_required_tickets (group_id, ticket_code) VALUES (?1, ?2)",
            params![ticket.group_id, ticket.ticket_code],
        )?;
        Ok(())
    }

    pub fn insert_group_substitution(&self, substitution: &GroupSubstitution) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO group_substitutions (group_id, substitute_group_id) VALUES (?1, ?2)",
            params![substitution.group_id, substitution.substitute_group_id],
        )?;
        Ok(())
    }

    // ==========================================
    // Internal queries (work on a connection or an open transaction)
    // ==========================================

    fn load_request(conn: &Connection, request_id: &str) -> StoreResult<Option<HireRequest>> {
        let request = conn
            .query_row(
                &format!("SELECT {} FROM hire_requests WHERE id = ?1", REQUEST_COLUMNS),
                params![request_id],
                map_request,
            )
            .optional()?;
        Ok(request)
    }

    fn load_allocation(conn: &Connection, allocation_id: &str) -> StoreResult<Option<Allocation>> {
        let allocation = conn
            .query_row(
                &format!("SELECT {} FROM allocations WHERE id = ?1", ALLOCATION_COLUMNS),
                params![allocation_id],
                map_allocation,
            )
            .optional()?;
        Ok(allocation)
    }

    /// Allocations + external hires already counted against the request
    fn satisfied_count(conn: &Connection, request_id: &str) -> StoreResult<u32> {
        let count: u32 = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM allocations WHERE request_id = ?1)
              + (SELECT COUNT(*) FROM external_hires WHERE request_id = ?1)",
            params![request_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Score every active asset of the group that is free over the range.
    ///
    /// Score is `1 / (1 + distance_km)` to the site; unknown home or site scores 0.
    fn score_free_assets(
        conn: &Connection,
        group_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        site: Option<(f64, f64)>,
        exclude_asset: Option<&str>,
    ) -> StoreResult<Vec<AssetScore>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT s.asset_code, s.home_lat, s.home_lon
            FROM assets s
            WHERE s.group_id = ?1
              AND s.is_active = 1
              AND NOT EXISTS (
                  SELECT 1 FROM allocations a
                  WHERE a.asset_code = s.asset_code
                    AND a.start_date <= ?3
                    AND ?2 <= a.end_date
              )
            ORDER BY s.asset_code
            "#,
        )?;

        let rows = stmt.query_map(params![group_id, start_date, end_date], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })?;

        let mut scores = Vec::new();
        for row in rows {
            let (asset_code, home_lat, home_lon) = row?;
            if exclude_asset == Some(asset_code.as_str()) {
                continue;
            }
            let score = site
                .and_then(|(lat, lon)| distance_from((home_lat, home_lon), lat, lon))
                .map(|km| 1.0 / (1.0 + km))
                .unwrap_or(0.0);
            scores.push(AssetScore { asset_code, score });
        }

        sort_asset_scores(&mut scores);
        Ok(scores)
    }

    fn query_calendar_events(
        conn: &Connection,
        allocation_id: Option<&str>,
    ) -> StoreResult<Vec<CalendarEvent>> {
        let sql = match allocation_id {
            Some(_) => format!("{} WHERE a.id = ?1", CALENDAR_EVENT_QUERY),
            None => format!("{} ORDER BY a.start_date, a.asset_code", CALENDAR_EVENT_QUERY),
        };
        let mut stmt = conn.prepare(&sql)?;
        let events = match allocation_id {
            Some(id) => stmt
                .query_map(params![id], map_calendar_event)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], map_calendar_event)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(events)
    }

    fn query_allocations(
        conn: &Connection,
        request_id: Option<&str>,
    ) -> StoreResult<Vec<Allocation>> {
        let allocations = match request_id {
            Some(id) => conn
                .prepare(&format!(
                    "SELECT {} FROM allocations WHERE request_id = ?1 ORDER BY start_date, asset_code",
                    ALLOCATION_COLUMNS
                ))?
                .query_map(params![id], map_allocation)?
                .collect::<Result<Vec<_>, _>>()?,
            None => conn
                .prepare(&format!(
                    "SELECT {} FROM allocations ORDER BY start_date, asset_code",
                    ALLOCATION_COLUMNS
                ))?
                .query_map([], map_allocation)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(allocations)
    }

    fn query_external_hires(
        conn: &Connection,
        request_id: Option<&str>,
    ) -> StoreResult<Vec<ExternalHire>> {
        let hires = match request_id {
            Some(id) => conn
                .prepare(
                    "SELECT id, contract_id, request_id FROM external_hires
                     WHERE request_id = ?1 ORDER BY created_at, id",
                )?
                .query_map(params![id], map_external_hire)?
                .collect::<Result<Vec<_>, _>>()?,
            None => conn
                .prepare(
                    "SELECT id, contract_id, request_id FROM external_hires ORDER BY created_at, id",
                )?
                .query_map([], map_external_hire)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(hires)
    }

    fn query_assignments(
        conn: &Connection,
        request_id: Option<&str>,
    ) -> StoreResult<Vec<OperatorAssignment>> {
        let assignments = match request_id {
            Some(id) => conn
                .prepare(&format!(
                    "SELECT {} FROM operator_assignments WHERE request_id = ?1 ORDER BY start_date, id",
                    ASSIGNMENT_COLUMNS
                ))?
                .query_map(params![id], map_assignment)?
                .collect::<Result<Vec<_>, _>>()?,
            None => conn
                .prepare(&format!(
                    "SELECT {} FROM operator_assignments ORDER BY start_date, id",
                    ASSIGNMENT_COLUMNS
                ))?
                .query_map([], map_assignment)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(assignments)
    }
}

// ==========================================
// Row mappers
// ==========================================

fn map_request(row: &Row<'_>) -> rusqlite::Result<HireRequest> {
    Ok(HireRequest {
        id: row.get(0)?,
        contract_id: row.get(1)?,
        group_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        quantity: row.get(5)?,
        operated: row.get(6)?,
        site_lat: row.get(7)?,
        site_lon: row.get(8)?,
    })
}

fn map_allocation(row: &Row<'_>) -> rusqlite::Result<Allocation> {
    Ok(Allocation {
        id: row.get(0)?,
        asset_code: row.get(1)?,
        group_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        request_id: row.get(5)?,
    })
}

fn map_external_hire(row: &Row<'_>) -> rusqlite::Result<ExternalHire> {
    Ok(ExternalHire {
        id: row.get(0)?,
        contract_id: row.get(1)?,
        request_id: row.get(2)?,
    })
}

fn map_assignment(row: &Row<'_>) -> rusqlite::Result<OperatorAssignment> {
    Ok(OperatorAssignment {
        id: row.get(0)?,
        request_id: row.get(1)?,
        operator_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
    })
}

fn map_calendar_event(row: &Row<'_>) -> rusqlite::Result<CalendarEvent> {
    let asset_code: String = row.get(2)?;
    let group_name: String = row.get(3)?;
    Ok(CalendarEvent {
        id: row.get(0)?,
        date: row.get(1)?,
        title: format!("{} - {}", asset_code, group_name),
        site: row.get(4)?,
        contract_status: row.get(5)?,
        operated: row.get(6)?,
        asset_code: Some(asset_code),
        operator_name: row.get(7)?,
    })
}

// ==========================================
// ResourceStore implementation
// ==========================================

#[async_trait]
impl ResourceStore for SqliteResourceStore {
    async fn get_request(&self, request_id: &str) -> StoreResult<Option<HireRequest>> {
        let conn = self.get_conn()?;
        Self::load_request(&conn, request_id)
    }

    async fn list_requests(&self) -> StoreResult<Vec<HireRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM hire_requests ORDER BY start_date, id",
            REQUEST_COLUMNS
        ))?;
        let requests = stmt
            .query_map([], map_request)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requests)
    }

    async fn list_allocations(&self) -> StoreResult<Vec<Allocation>> {
        let conn = self.get_conn()?;
        Self::query_allocations(&conn, None)
    }

    async fn list_allocations_for_request(&self, request_id: &str) -> StoreResult<Vec<Allocation>> {
        let conn = self.get_conn()?;
        Self::query_allocations(&conn, Some(request_id))
    }

    async fn list_external_hires(&self) -> StoreResult<Vec<ExternalHire>> {
        let conn = self.get_conn()?;
        Self::query_external_hires(&conn, None)
    }

    async fn list_external_hires_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<ExternalHire>> {
        let conn = self.get_conn()?;
        Self::query_external_hires(&conn, Some(request_id))
    }

    async fn list_operator_assignments(&self) -> StoreResult<Vec<OperatorAssignment>> {
        let conn = self.get_conn()?;
        Self::query_assignments(&conn, None)
    }

    async fn list_assignments_for_request(
        &self,
        request_id: &str,
    ) -> StoreResult<Vec<OperatorAssignment>> {
        let conn = self.get_conn()?;
        Self::query_assignments(&conn, Some(request_id))
    }

    async fn list_calendar_events(&self) -> StoreResult<Vec<CalendarEvent>> {
        let conn = self.get_conn()?;
        Self::query_calendar_events(&conn, None)
    }

    async fn allocate_best_asset(&self, request_id: &str) -> StoreResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let request = Self::load_request(&tx, request_id)?
            .ok_or_else(|| StoreError::not_found("request", request_id))?;

        if Self::satisfied_count(&tx, request_id)? >= request.quantity {
            return Err(StoreError::rejected("REQUEST_FULLY_ALLOCATED"));
        }

        let best = Self::score_free_assets(
            &tx,
            &request.group_id,
            request.start_date,
            request.end_date,
            Some((request.site_lat, request.site_lon)),
            None,
        )?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::rejected("NO_INTERNAL_ASSET_AVAILABLE"))?;

        tx.execute(
            &format!(
                "INSERT INTO allocations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                ALLOCATION_COLUMNS
            ),
            params![
                Uuid::new_v4().to_string(),
                best.asset_code,
                request.group_id,
                request.start_date,
                request.end_date,
                request.id,
            ],
        )?;
        tx.commit()?;

        debug!(request_id = %request_id, asset_code = %best.asset_code, "asset allocated");
        Ok(())
    }

    async fn score_assets(&self, request_id: &str) -> StoreResult<Vec<AssetScore>> {
        let conn = self.get_conn()?;
        let request = Self::load_request(&conn, request_id)?
            .ok_or_else(|| StoreError::not_found("request", request_id))?;
        Self::score_free_assets(
            &conn,
            &request.group_id,
            request.start_date,
            request.end_date,
            Some((request.site_lat, request.site_lon)),
            None,
        )
    }

    async fn rank_operators(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        lat: f64,
        lon: f64,
    ) -> StoreResult<Vec<OperatorMatch>> {
        if start_date > end_date {
            return Err(StoreError::rejected("INVALID_DATE_RANGE"));
        }

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT o.id, o.name, o.home_lat, o.home_lon
            FROM operators o
            WHERE o.is_active = 1
              AND NOT EXISTS (
                  SELECT 1 FROM operator_assignments oa
                  WHERE oa.operator_id = o.id
                    AND oa.start_date <= ?2
                    AND ?1 <= oa.end_date
              )
              AND NOT EXISTS (
                  SELECT 1 FROM operator_unavailability u
                  WHERE u.operator_id = o.id
                    AND u.start_date <= ?2
                    AND ?1 <= u.end_date
              )
            ORDER BY o.name, o.id
            "#,
        )?;

        let rows = stmt.query_map(params![start_date, end_date], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
            ))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            let (operator_id, operator_name, home_lat, home_lon) = row?;
            let distance_km = distance_from((home_lat, home_lon), lat, lon);
            if let (Some(radius), Some(km)) = (self.operator_search_radius_km, distance_km) {
                if km > radius {
                    continue;
                }
            }
            matches.push(OperatorMatch {
                operator_id,
                operator_name,
                distance_km,
            });
        }

        sort_operator_matches(&mut matches);
        Ok(matches)
    }

    async fn off_hire_allocation(&self, allocation_id: &str) -> StoreResult<()> {
        let conn = self.get_conn()?;
        let removed = conn.execute("DELETE FROM allocations WHERE id = ?1", params![allocation_id])?;
        if removed == 0 {
            return Err(StoreError::not_found("allocation", allocation_id));
        }
        debug!(allocation_id = %allocation_id, "allocation off-hired");
        Ok(())
    }

    async fn reassign_allocation(&self, allocation_id: &str) -> StoreResult<CalendarEvent> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let allocation = Self::load_allocation(&tx, allocation_id)?
            .ok_or_else(|| StoreError::not_found("allocation", allocation_id))?;

        let site = match allocation.request_id.as_deref() {
            Some(request_id) => {
                Self::load_request(&tx, request_id)?.map(|r| (r.site_lat, r.site_lon))
            }
            None => None,
        };

        let replacement = Self::score_free_assets(
            &tx,
            &allocation.group_id,
            allocation.start_date,
            allocation.end_date,
            site,
            Some(&allocation.asset_code),
        )?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::rejected("ALLOCATION_OVERLAP"))?;

        tx.execute(
            "UPDATE allocations SET asset_code = ?1 WHERE id = ?2",
            params![replacement.asset_code, allocation_id],
        )?;

        let event = Self::query_calendar_events(&tx, Some(allocation_id))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("allocation", allocation_id))?;
        tx.commit()?;

        debug!(
            allocation_id = %allocation_id,
            from = %allocation.asset_code,
            to = %replacement.asset_code,
            "allocation reassigned"
        );
        Ok(event)
    }

    async fn week_starts(&self) -> StoreResult<Vec<NaiveDate>> {
        let conn = self.get_conn()?;
        let allocations = Self::query_allocations(&conn, None)?;
        Ok(week_starts_spanning(
            allocations.iter().map(|a| (a.start_date, a.end_date)),
        ))
    }

    async fn query_group_substitutions(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupSubstitution>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT group_id, substitute_group_id FROM group_substitutions
             WHERE group_id = ?1 ORDER BY substitute_group_id",
        )?;
        let substitutions = stmt
            .query_map(params![group_id], |row| {
                Ok(GroupSubstitution {
                    group_id: row.get(0)?,
                    substitute_group_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(substitutions)
    }

    async fn query_group_required_tickets(
        &self,
        group_id: &str,
    ) -> StoreResult<Vec<GroupRequiredTicket>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT group_id, ticket_code FROM group_required_tickets
             WHERE group_id = ?1 ORDER BY ticket_code",
        )?;
        let tickets = stmt
            .query_map(params![group_id], |row| {
                Ok(GroupRequiredTicket {
                    group_id: row.get(0)?,
                    ticket_code: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    async fn query_operator_tickets(&self, operator_id: &str) -> StoreResult<Vec<OperatorTicket>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT operator_id, ticket_code FROM operator_tickets
             WHERE operator_id = ?1 ORDER BY ticket_code",
        )?;
        let tickets = stmt
            .query_map(params![operator_id], |row| {
                Ok(OperatorTicket {
                    operator_id: row.get(0)?,
                    ticket_code: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    async fn create_external_hire(&self, request_id: &str) -> StoreResult<ExternalHire> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let request = Self::load_request(&tx, request_id)?
            .ok_or_else(|| StoreError::not_found("request", request_id))?;

        if Self::satisfied_count(&tx, request_id)? >= request.quantity {
            return Err(StoreError::rejected("REQUEST_FULLY_ALLOCATED"));
        }

        let hire = ExternalHire {
            id: Uuid::new_v4().to_string(),
            contract_id: request.contract_id,
            request_id: Some(request.id),
        };
        tx.execute(
            "INSERT INTO external_hires (id, contract_id, request_id) VALUES (?1, ?2, ?3)",
            params![hire.id, hire.contract_id, hire.request_id],
        )?;
        tx.commit()?;

        debug!(request_id = %request_id, external_hire_id = %hire.id, "external hire created");
        Ok(hire)
    }

    async fn update_external_hire(
        &self,
        external_hire_id: &str,
        request_id: Option<&str>,
    ) -> StoreResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let current: Option<Option<String>> = tx
            .query_row(
                "SELECT request_id FROM external_hires WHERE id = ?1",
                params![external_hire_id],
                |row| row.get(0),
            )
            .optional()?;
        let current =
            current.ok_or_else(|| StoreError::not_found("external_hire", external_hire_id))?;

        match request_id {
            Some(request_id) => {
                let request = Self::load_request(&tx, request_id)?
                    .ok_or_else(|| StoreError::not_found("request", request_id))?;
                // the hire already counts towards its own request
                if current.as_deref() != Some(request_id)
                    && Self::satisfied_count(&tx, request_id)? >= request.quantity
                {
                    return Err(StoreError::rejected("REQUEST_FULLY_ALLOCATED"));
                }
                tx.execute(
                    "UPDATE external_hires SET request_id = ?1, contract_id = ?2 WHERE id = ?3",
                    params![request.id, request.contract_id, external_hire_id],
                )?;
            }
            None => {
                tx.execute(
                    "UPDATE external_hires SET request_id = NULL WHERE id = ?1",
                    params![external_hire_id],
                )?;
            }
        }
        tx.commit()?;

        debug!(external_hire_id = %external_hire_id, request_id = ?request_id, "external hire re-linked");
        Ok(())
    }

    async fn cancel_external_hire(&self, external_hire_id: &str) -> StoreResult<()> {
        let conn = self.get_conn()?;
        let removed = conn.execute(
            "DELETE FROM external_hires WHERE id = ?1",
            params![external_hire_id],
        )?;
        if removed == 0 {
            return Err(StoreError::not_found("external_hire", external_hire_id));
        }
        Ok(())
    }

    async fn create_operator_assignment(
        &self,
        assignment: NewOperatorAssignment,
    ) -> StoreResult<OperatorAssignment> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let request = Self::load_request(&tx, &assignment.request_id)?
            .ok_or_else(|| StoreError::not_found("request", &assignment.request_id))?;
        let assigned: u32 = tx.query_row(
            "SELECT COUNT(*) FROM operator_assignments WHERE request_id = ?1",
            params![request.id],
            |row| row.get(0),
        )?;
        if assigned >= request.quantity {
            return Err(StoreError::rejected("REQUEST_NOT_ASSIGNABLE"));
        }

        let created = OperatorAssignment {
            id: Uuid::new_v4().to_string(),
            request_id: assignment.request_id,
            operator_id: assignment.operator_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
        };
        tx.execute(
            &format!(
                "INSERT INTO operator_assignments ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                ASSIGNMENT_COLUMNS
            ),
            params![
                created.id,
                created.request_id,
                created.operator_id,
                created.start_date,
                created.end_date,
            ],
        )?;
        tx.commit()?;

        debug!(
            request_id = %created.request_id,
            operator_id = %created.operator_id,
            "operator assignment created"
        );
        Ok(created)
    }
}
