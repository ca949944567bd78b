use std::sync::Arc;

use model::config::RunConfig;
use model::json_serialisation::DayInput;

use oracle::{LocationsById, TravelOracle};

use super::*;

fn two_session_input() -> DayInput {
    serde_json::from_value(serde_json::json!({
        "dayOfMonth": 5,
        "sessions": [
            {"clientId": "client-x", "startMinute": 540, "durationMinutes": 30, "serviceTag": "REPAS"},
            {"clientId": "client-y", "startMinute": 600, "durationMinutes": 30, "serviceTag": "REPAS"}
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
            {"id": "client-x", "lat": 48.85, "lon": 2.35},
            {"id": "client-y", "lat": 48.86, "lon": 2.36}
        ],
        "travelEdges": [
            {"sourceId": "client-x", "destinationId": "client-y", "mode": "driving", "seconds": 600, "meters": 3000},
            {"sourceId": "client-y", "destinationId": "client-x", "mode": "driving", "seconds": 600, "meters": 3000}
        ],
        "availability": []
    }))
    .expect("sample input must deserialize")
}

fn build_instance(input: &DayInput, config: &RunConfig) -> Instance {
    let clients = model::json_serialisation::build_clients(input);
    let caregivers = model::json_serialisation::build_caregivers(input);
    let locations = LocationsById::new(
        clients.iter().map(|c| c.id()),
        caregivers.iter().map(|c| c.id()),
    );
    let oracle = Arc::new(TravelOracle::build(&input.travel_edges, &locations));
    Instance::build(input, oracle, config).unwrap()
}

#[test]
fn assembles_one_edge_variable_set_per_disjunction() {
    let input = two_session_input();
    let instance = build_instance(&input, &RunConfig::default());
    let assembled = assemble(&instance);

    assert_eq!(assembled.edges.len(), instance.disjunctions().len());
    for disjunction in instance.disjunctions() {
        let key = (disjunction.c1, disjunction.c2, disjunction.caregiver);
        assert!(assembled.edges.contains_key(&key));
    }
}

#[test]
fn every_edge_contributes_five_constraints() {
    let input = two_session_input();
    let instance = build_instance(&input, &RunConfig::default());
    let assembled = assemble(&instance);

    let edge_constraints = assembled.edges.len() * 5;
    // plus 3 per case (out/in/covered) and 2 per task (single-caregiver, flow balance)
    let expected = edge_constraints + instance.cases().len() * 3 + instance.tasks().len() * 2;
    assert_eq!(assembled.constraints.len(), expected);
}

#[test]
fn carbon_reduction_toggles_meters_term_without_changing_edge_count() {
    let input = two_session_input();
    let mut config = RunConfig::default();
    config.carbon_reduction = true;
    let instance = build_instance(&input, &config);
    let assembled = assemble(&instance);

    assert_eq!(assembled.edges.len(), instance.disjunctions().len());
}
