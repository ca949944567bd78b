use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_day_file(contents: &str) -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("cli-test-day-{}-{id}.json", std::process::id()));
    fs::write(&path, contents).expect("write temp day file");
    path
}

fn single_session_json() -> String {
    serde_json::json!({
        "dayOfMonth": 10,
        "sessions": [
            {"clientId": "client-1", "startMinute": 540, "durationMinutes": 60, "serviceTag": "REPAS"}
        ],
        "caregivers": [
            {
                "id": "caregiver-1",
                "homeLat": 48.8, "homeLon": 2.3,
                "hasPersonalVehicle": true,
                "hasLicense": true,
                "competenceTags": ["REPAS"]
            }
        ],
        "clients": [
            {"id": "client-1", "lat": 48.85, "lon": 2.35}
        ],
        "travelEdges": [],
        "availability": []
    })
    .to_string()
}

#[test]
fn load_day_input_round_trips_a_valid_file() {
    let path = temp_day_file(&single_session_json());
    let input = load_day_input(&path).expect("well-formed day input loads");
    assert_eq!(input.day_of_month, 10);
    assert_eq!(input.sessions.len(), 1);
    let _ = fs::remove_file(&path);
}

#[test]
fn load_day_input_reports_missing_file_as_missing_input() {
    let missing = std::env::temp_dir().join("cli-test-day-does-not-exist.json");
    let result = load_day_input(&missing);
    assert!(matches!(result, Err(CoreError::MissingInput { .. })));
}

#[test]
fn solve_file_produces_one_assignment_for_a_single_session_day() {
    let path = temp_day_file(&single_session_json());
    let json = solve_file(&path, &RunConfig::default()).expect("day solves");
    let assignments = json["assignments"].as_array().expect("assignments array");
    assert_eq!(assignments.len(), 1);
    let _ = fs::remove_file(&path);
}

#[test]
fn output_path_for_prefixes_file_name_with_output() {
    let input = Path::new("/tmp/instances/day_05.json");
    let output_dir = Path::new("/tmp/output");
    let resolved = output_path_for(input, output_dir);
    assert_eq!(resolved, Path::new("/tmp/output/output_day_05.json"));
}
