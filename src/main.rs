// ==========================================
// FleetFlow - command line entry point
// ==========================================
// Usage:
//   fleet-flow [--json-logs] status
//   fleet-flow [--json-logs] allocate <request_id>
//   fleet-flow [--json-logs] rank <request_id>
//   fleet-flow [--json-logs] assign <request_id> <operator_id>
//   fleet-flow [--json-logs] week <YYYY-MM-DD>
//
// The caller role comes from FLEETFLOW_ROLE (default: admin).
// ==========================================

use anyhow::{anyhow, bail, Context};
use fleet_flow::app::AppState;
use fleet_flow::config::AppConfig;
use fleet_flow::domain::{AccessContext, CalendarFilter, Role};
use fleet_flow::logging;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn caller() -> anyhow::Result<AccessContext> {
    let role = match std::env::var("FLEETFLOW_ROLE") {
        Ok(raw) => raw.parse::<Role>().map_err(|e| anyhow!(e))?,
        Err(_) => Role::Admin,
    };
    Ok(AccessContext::new("cli", role))
}

#[derive(Serialize)]
struct StatusReport {
    db_path: String,
    open_requests: Vec<fleet_flow::api::OpenRequest>,
    open_operated_requests: Vec<fleet_flow::api::OpenRequest>,
    week_starts: Vec<chrono::NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json_logs = args.iter().any(|a| a == "--json-logs");
    args.retain(|a| a != "--json-logs");

    let config = AppConfig::load().context("loading configuration")?;
    if json_logs {
        logging::init_json(&config.log_filter);
    } else {
        logging::init(&config.log_filter);
    }
    tracing::info!(version = fleet_flow::VERSION, "{}", fleet_flow::APP_NAME);

    let state = AppState::open(config, None).context("opening resource store")?;
    let ctx = caller()?;

    let command = args.first().map(String::as_str).unwrap_or("status");
    let arg = |i: usize, name: &str| {
        args.get(i)
            .cloned()
            .ok_or_else(|| anyhow!("missing argument <{}>", name))
    };

    match command {
        "status" => {
            let report = StatusReport {
                db_path: state.config.db_path.clone(),
                open_requests: state.plant_api.list_open_requests().await?,
                open_operated_requests: state.workforce_api.list_open_operated_requests().await?,
                week_starts: state.calendar_api.week_starts().await?,
            };
            print_json(&report)?;
        }
        "allocate" => {
            let request_id = arg(1, "request_id")?;
            let summary = state.plant_api.allocate(&ctx, &request_id).await?;
            print_json(&summary)?;
        }
        "rank" => {
            let request_id = arg(1, "request_id")?;
            let mut session = state.workforce_api.open_session(&request_id).await?;
            let matches = session.rank(&ctx).await?;
            print_json(&matches)?;
        }
        "assign" => {
            let request_id = arg(1, "request_id")?;
            let operator_id = arg(2, "operator_id")?;
            let mut session = state.workforce_api.open_session(&request_id).await?;
            session.rank(&ctx).await?;
            let assignment = session.assign(&ctx, &operator_id).await?;
            print_json(&assignment)?;
        }
        "week" => {
            let date = arg(1, "date")?;
            let view = state
                .calendar_api
                .week_view(&date, &CalendarFilter::default())
                .await?;
            print_json(&view)?;
        }
        other => bail!("unknown command: {}", other),
    }

    Ok(())
}
