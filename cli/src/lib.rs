//! Single-day and multi-day batch entry points for the `single_run`
//! binary. Grounded on the teacher's `internal` crate: one file in, one
//! JSON result out for a single day, and (the SPEC_FULL.md §5 addition)
//! a `rayon`-parallel batch runner across multiple day files, since
//! "distinct days are embarrassingly parallel" (spec.md §5) and the
//! teacher already depends on `rayon` for exactly this shape of fan-out.

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use model::config::RunConfig;
use model::error::{CoreError, CoreResult};
use model::json_serialisation::DayInput;

use oracle::{LocationsById, TravelOracle};
use solver::{DaySolution, SolveOutcome};

/// Reads one day's JSON instance from disk and deserializes it.
pub fn load_day_input(path: &Path) -> CoreResult<DayInput> {
    let raw = fs::read_to_string(path).map_err(|e| CoreError::MissingInput {
        day: 0,
        detail: format!("cannot read {}: {e}", path.display()),
    })?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| CoreError::MissingInput {
        day: 0,
        detail: format!("malformed JSON in {}: {e}", path.display()),
    })?;
    model::json_serialisation::load_day_input_from_json(value).map_err(|e| CoreError::MissingInput {
        day: 0,
        detail: format!("{} does not match the day-input contract: {e}", path.display()),
    })
}

/// Builds the Travel Oracle for a single day's input (spec.md §4.1
/// "Construction": one oracle per run, built from that day's roster).
pub fn build_oracle(input: &DayInput) -> Arc<TravelOracle> {
    let clients = model::json_serialisation::build_clients(input);
    let caregivers = model::json_serialisation::build_caregivers(input);
    let locations = LocationsById::new(
        clients.iter().map(|c| c.id()),
        caregivers.iter().map(|c| c.id()),
    );
    Arc::new(TravelOracle::build(&input.travel_edges, &locations))
}

/// Solves one day end to end and renders the result as JSON, the same
/// shape `write_to_json` below persists to disk.
pub fn solve_file(path: &Path, config: &RunConfig) -> CoreResult<serde_json::Value> {
    let input = load_day_input(path)?;
    let oracle = build_oracle(&input);
    let started = Instant::now();
    let solution = solver::solve_day(&input, oracle, config)?;
    Ok(solution_to_json(&solution, started.elapsed()))
}

fn outcome_label(outcome: SolveOutcome) -> &'static str {
    match outcome {
        SolveOutcome::Optimal => "optimal",
        SolveOutcome::FeasibleWithinBudget { .. } => "feasible-within-budget",
        SolveOutcome::Infeasible => "infeasible",
        SolveOutcome::TimeoutNoIncumbent => "timeout-no-incumbent",
    }
}

fn not_proven_optimal(outcome: SolveOutcome) -> bool {
    matches!(
        outcome,
        SolveOutcome::FeasibleWithinBudget {
            not_proven_optimal: true
        }
    )
}

pub fn solution_to_json(solution: &DaySolution, elapsed: std::time::Duration) -> serde_json::Value {
    let assignments: Vec<_> = solution
        .assignments
        .iter()
        .map(|a| {
            serde_json::json!({
                "sessionIdx": a.session.0,
                "caregiverId": a.caregiver.map(|c| c.to_string()),
            })
        })
        .collect();

    let routes: Vec<_> = solution
        .routes
        .iter()
        .map(|r| {
            serde_json::json!({
                "caregiverId": r.caregiver.to_string(),
                "sessions": r.sessions.iter().map(|s| s.0).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "dayOfMonth": solution.day_of_month,
        "outcome": outcome_label(solution.outcome),
        "notProvenOptimal": not_proven_optimal(solution.outcome),
        "usedGreedyFallback": solution.used_greedy_fallback,
        "missingTravelLookups": solution.missing_travel_lookups,
        "assignments": assignments,
        "routes": routes,
        "runningTimeSeconds": elapsed.as_secs_f64(),
    })
}

/// Solves every file in `paths` in parallel (one `rayon` task per day,
/// nothing shared but the immutable `RunConfig`), writing each result
/// next to `output_dir` and isolating per-day failures so one bad day
/// does not abort the batch (spec.md §7 "per-day errors are isolated; a
/// multi-day batch continues after a day's failure").
pub fn run_batch(paths: &[PathBuf], config: &RunConfig, output_dir: &Path) -> Vec<(PathBuf, CoreResult<PathBuf>)> {
    paths
        .par_iter()
        .map(|path| {
            let result = solve_file(path, config).map(|json| {
                let out_path = output_path_for(path, output_dir);
                if let Some(parent) = out_path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                if let Ok(file) = fs::File::create(&out_path) {
                    let _ = serde_json::to_writer_pretty(file, &json);
                }
                out_path
            });
            if let Err(ref err) = result {
                log::error!("day from {} failed: {err}", path.display());
            }
            (path.clone(), result)
        })
        .collect()
}

fn output_path_for(input_path: &Path, output_dir: &Path) -> PathBuf {
    let file_name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "day".to_string());
    output_dir.join(format!("output_{file_name}"))
}
