//! Thin Axum HTTP wrapper around the core (SPEC_FULL.md §2): `/health`
//! and `/solve`, exposing the optimizer as an operational API for a
//! batch scheduler to call, grounded directly on the teacher's own
//! `server` crate (`solve_instance`, `create_output_json` shape below),
//! adapted from the teacher's greedy+local-search pipeline to this
//! repository's MILP-then-greedy-fallback one.


use std::time::Instant;

use gethostname::gethostname;

use model::config::RunConfig;
use model::json_serialisation::DayInput;

/// Accepts one day's raw JSON instance plus the spec.md §6 configuration
/// options and returns the solved assignment as JSON. Deserialization or
/// MILP failures are folded into the `"error"` field rather than a panic
/// or HTTP error code, mirroring the teacher's `solve_instance`, which
/// never itself returns a `Result` to the HTTP layer.
pub fn solve_instance(request: serde_json::Value) -> serde_json::Value {
    let started = Instant::now();

    let config = request
        .get("config")
        .cloned()
        .map(config_from_json)
        .unwrap_or_default();

    let day_input = match request.get("dayInput").cloned() {
        Some(value) => value,
        None => request.clone(),
    };

    let input: DayInput = match model::json_serialisation::load_day_input_from_json(day_input) {
        Ok(input) => input,
        Err(err) => return error_response(&format!("malformed day input: {err}"), started),
    };

    let oracle = cli::build_oracle(&input);
    match solver::solve_day(&input, oracle, &config) {
        Ok(solution) => {
            let mut json = cli::solution_to_json(&solution, started.elapsed());
            attach_run_info(&mut json, started);
            json
        }
        Err(err) => error_response(&err.to_string(), started),
    }
}

fn config_from_json(value: serde_json::Value) -> RunConfig {
    let mut config = RunConfig::default();
    if let Some(b) = value.get("includeAvailability").and_then(|v| v.as_bool()) {
        config.include_availability = b;
    }
    if let Some(s) = value.get("transport").and_then(|v| v.as_str()) {
        config.transport = match s {
            "license" => model::caregiver::TransportPolicy::ByLicense,
            _ => model::caregiver::TransportPolicy::ForceDriving,
        };
    }
    if let Some(b) = value.get("filterForCompetence").and_then(|v| v.as_bool()) {
        config.filter_for_competence = b;
    }
    if let Some(b) = value.get("carbonReduction").and_then(|v| v.as_bool()) {
        config.carbon_reduction = b;
    }
    if let Some(n) = value.get("timeLimitSeconds").and_then(|v| v.as_u64()) {
        config.time_limit_seconds = n as u32;
    }
    config
}

fn error_response(message: &str, started: Instant) -> serde_json::Value {
    serde_json::json!({
        "error": message,
        "info": run_info(started),
    })
}

fn attach_run_info(json: &mut serde_json::Value, started: Instant) {
    if let Some(obj) = json.as_object_mut() {
        obj.insert("info".to_string(), run_info(started));
    }
}

fn run_info(started: Instant) -> serde_json::Value {
    serde_json::json!({
        "runningTime": format!("{:0.2}sec", started.elapsed().as_secs_f32()),
        "numberOfThreads": rayon::current_num_threads(),
        "hostname": gethostname().into_string().unwrap_or_else(|_| "unknown".to_string()),
    })
}
