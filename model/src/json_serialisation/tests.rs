use super::*;

fn sample_input() -> DayInput {
    serde_json::from_value(serde_json::json!({
        "dayOfMonth": 5,
        "sessions": [
            {"clientId": "client-1", "startMinute": 540, "durationMinutes": 60, "serviceTag": "REPAS"},
            {"clientId": "caregiver-1", "startMinute": 300, "durationMinutes": 0, "serviceTag": "COMMUTE"},
        ],
        "caregivers": [
            {
                "id": "caregiver-1",
                "homeLat": 48.8, "homeLon": 2.3,
                "hasPersonalVehicle": true,
                "hasLicense": true,
                "competenceTags": ["REPAS", "TOILETTE"]
            }
        ],
        "clients": [
            {"id": "client-1", "lat": 48.85, "lon": 2.35}
        ],
        "travelEdges": [],
        "availability": [
            {"caregiverId": "caregiver-1", "unavailableDays": [5, 12]}
        ]
    }))
    .expect("sample input must deserialize")
}

#[test]
fn builds_caregiver_with_folded_availability() {
    let input = sample_input();
    let caregivers = build_caregivers(&input);
    assert_eq!(caregivers.len(), 1);
    assert!(!caregivers[0].is_available_on(5));
    assert!(caregivers[0].is_available_on(6));
}

#[test]
fn canonicalizes_competence_tags_on_ingest() {
    let input = sample_input();
    let caregivers = build_caregivers(&input);
    assert!(caregivers[0].is_competent_for(service_tag::canonicalize("REPAS")));
}

#[test]
fn orders_sessions_by_start_time() {
    let input = sample_input();
    let ordered = order_sessions(&input.sessions);
    assert_eq!(ordered[0].0, SessionIdx(0));
    assert_eq!(ordered[0].1.client_id, "caregiver-1"); // 5:00 sentinel sorts first
    assert_eq!(ordered[1].1.client_id, "client-1");
}
