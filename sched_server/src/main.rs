//! HTTP/JSON adapter over the scheduling kernel: accepts a runnable table,
//! runs the requested policy combination, and returns the timeline together
//! with an SVG Gantt rendering.
mod gantt;

use std::collections::BTreeMap;

use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use lib::dag_creator::{task_graph_from_specs, RunnableSpec};
use lib::errors::SchedulerError;
use lib::policy::{AllocationPolicy, SchedulingPolicy};
use lib::scheduler::{run_scheduler, SchedulerConfig, SimulationResult};
use lib::task_graph::TaskGraph;
use log::info;
use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

#[derive(Parser)]
#[clap(
    name = "sched_server",
    version = "1.0",
    about = "HTTP/JSON adapter over the event-time scheduling kernel."
)]
struct ArgParser {
    ///Address to bind.
    #[clap(short = 'b', long = "bind_address", default_value = "0.0.0.0:5001")]
    bind_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    #[serde(default)]
    runnables: BTreeMap<String, RunnableSpec>,
    #[serde(default = "default_num_cores")]
    num_cores: usize,
    /// Horizon factor forwarded to the kernel when positive.
    simulation_time: Option<i32>,
    algorithm: Option<String>,
    allocation: Option<String>,
}

fn default_num_cores() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct LogEntry {
    start: i32,
    end: i32,
    task: String,
    instance: usize,
    core: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlgorithmResult {
    total_execution_time: i32,
    execution_log: Vec<LogEntry>,
    gantt_chart: String,
}

/// Entries in emission order with a per-task instance index.
fn execution_log(result: &SimulationResult) -> Vec<LogEntry> {
    let mut instance_counter: BTreeMap<&str, usize> = BTreeMap::new();
    result
        .schedule
        .iter()
        .map(|entry| {
            let instance = instance_counter.entry(entry.name.as_str()).or_insert(0);
            let log_entry = LogEntry {
                start: entry.start_time,
                end: entry.finish_time,
                task: entry.name.clone(),
                instance: *instance,
                core: entry.core,
            };
            *instance += 1;
            log_entry
        })
        .collect()
}

fn run_algorithm(
    graph: &TaskGraph,
    num_cores: usize,
    scheduling: SchedulingPolicy,
    allocation: AllocationPolicy,
    iterations: Option<i32>,
) -> Result<AlgorithmResult, SchedulerError> {
    let mut config = SchedulerConfig::new(num_cores, scheduling, allocation);
    if let Some(iterations) = iterations {
        config = config.with_iterations(iterations);
    }
    let result = run_scheduler(graph, config)?;
    Ok(AlgorithmResult {
        total_execution_time: result.makespan,
        gantt_chart: gantt::render_svg(&result.schedule, num_cores),
        execution_log: execution_log(&result),
    })
}

fn handle_schedule(request: ScheduleRequest) -> Result<Value, SchedulerError> {
    if request.runnables.is_empty() {
        return Err(SchedulerError::InputShape(
            "no runnables provided".to_string(),
        ));
    }
    let graph = task_graph_from_specs(&request.runnables)?;
    let allocation: AllocationPolicy = request
        .allocation
        .as_deref()
        .unwrap_or("dynamic")
        .parse()?;
    let iterations = request.simulation_time.filter(|&factor| factor > 0);

    match request.algorithm.as_deref().unwrap_or("all") {
        "all" => {
            let fcfs = run_algorithm(
                &graph,
                request.num_cores,
                SchedulingPolicy::Fcfs,
                allocation,
                iterations,
            )?;
            let pas = run_algorithm(
                &graph,
                request.num_cores,
                SchedulingPolicy::Pas,
                allocation,
                iterations,
            )?;
            Ok(json!({"success": true, "results": {"fcfs": fcfs, "pas": pas}}))
        }
        name => {
            let scheduling: SchedulingPolicy = name.parse()?;
            let algorithm_result = run_algorithm(
                &graph,
                request.num_cores,
                scheduling,
                allocation,
                iterations,
            )?;
            let mut value = serde_json::to_value(&algorithm_result)
                .map_err(|err| SchedulerError::InputShape(err.to_string()))?;
            if let Value::Object(ref mut map) = value {
                map.insert("success".to_string(), Value::Bool(true));
            }
            Ok(value)
        }
    }
}

async fn schedule_handler(
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match handle_schedule(request) {
        Ok(value) => Ok(Json(value)),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": err.to_string()})),
        )),
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

fn app() -> Router {
    Router::new()
        .route("/api/schedule", post(schedule_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();

    let listener = tokio::net::TcpListener::bind(&arg.bind_address).await?;
    info!("Listening on {}.", arg.bind_address);
    axum::serve(listener, app()).await?;

    Ok(())
}
