//! DTOs for the input contracts in spec.md §6, and the conversions from
//! those DTOs into the domain types the rest of the core consumes. CSV
//! loading, spreadsheet parsing, and the Google-Maps probe that originally
//! populate these records are out of scope (spec.md §1); this module only
//! owns the JSON shape and the DTO → domain mapping, mirroring the
//! teacher's `model::json_serialisation` split between wire format and
//! domain construction.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::base_types::{CaregiverId, ClientId, SessionIdx};
use crate::caregiver::Caregiver;
use crate::client::Client;
use crate::service_tag;
use crate::time::{Duration, Minute};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverRecord {
    pub id: String,
    pub home_lat: f64,
    pub home_lon: f64,
    pub has_personal_vehicle: Option<bool>,
    pub has_license: bool,
    pub competence_tags: Vec<String>,
}

impl From<&CaregiverRecord> for Caregiver {
    fn from(record: &CaregiverRecord) -> Caregiver {
        let competence = record
            .competence_tags
            .iter()
            .map(|tag| service_tag::canonicalize(tag))
            .collect::<HashSet<_>>();
        Caregiver::new(
            CaregiverId::from(&record.id),
            record.home_lat,
            record.home_lon,
            record.has_personal_vehicle.unwrap_or(false),
            record.has_license,
            competence,
            HashSet::new(), // populated separately from AvailabilityRecord
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&ClientRecord> for Client {
    fn from(record: &ClientRecord) -> Client {
        Client::new(ClientId::from(&record.id), record.lat, record.lon)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TravelModeRecord {
    Driving,
    Bicycling,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TravelEdgeRecord {
    pub source_id: String,
    pub destination_id: String,
    pub mode: TravelModeRecord,
    pub seconds: u32,
    pub meters: u64,
}

/// `client_id` may refer to a client or to a caregiver's own id (for
/// sentinel-adjacent rows already present upstream); which one it is gets
/// resolved against the day's caregiver/client roster by the Instance
/// Builder, not here.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub client_id: String,
    pub start_minute: u16,
    pub duration_minutes: u16,
    pub service_tag: String,
}

impl SessionRecord {
    pub fn start(&self) -> Minute {
        Minute::new(self.start_minute)
    }

    pub fn duration(&self) -> Duration {
        Duration(self.duration_minutes)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub caregiver_id: String,
    pub unavailable_days: Vec<u8>,
}

/// The full raw input for a single day, ready for the Instance Builder.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayInput {
    pub day_of_month: u8,
    pub sessions: Vec<SessionRecord>,
    pub caregivers: Vec<CaregiverRecord>,
    pub clients: Vec<ClientRecord>,
    pub travel_edges: Vec<TravelEdgeRecord>,
    pub availability: Vec<AvailabilityRecord>,
}

pub fn load_day_input_from_json(value: serde_json::Value) -> serde_json::Result<DayInput> {
    serde_json::from_value(value)
}

/// Builds the day's caregiver roster from `caregivers` + `availability`,
/// folding each caregiver's unavailable-day set in (spec.md §3: caregiver
/// availability is a separate input stream, joined by id).
pub fn build_caregivers(input: &DayInput) -> Vec<Caregiver> {
    let mut unavailable: std::collections::HashMap<&str, HashSet<u8>> =
        std::collections::HashMap::new();
    for rec in &input.availability {
        unavailable
            .entry(rec.caregiver_id.as_str())
            .or_default()
            .extend(rec.unavailable_days.iter().copied());
    }

    input
        .caregivers
        .iter()
        .map(|record| {
            let mut caregiver = Caregiver::from(record);
            if let Some(days) = unavailable.get(record.id.as_str()) {
                caregiver = Caregiver::new(
                    caregiver.id(),
                    caregiver.home_coordinates().0,
                    caregiver.home_coordinates().1,
                    caregiver.has_personal_vehicle(),
                    caregiver.has_license(),
                    caregiver_competence(record),
                    days.clone(),
                );
            }
            caregiver
        })
        .collect()
}

fn caregiver_competence(record: &CaregiverRecord) -> HashSet<crate::base_types::ServiceTag> {
    record
        .competence_tags
        .iter()
        .map(|tag| service_tag::canonicalize(tag))
        .collect()
}

pub fn build_clients(input: &DayInput) -> Vec<Client> {
    input.clients.iter().map(Client::from).collect()
}

/// A session's idx is not shipped on the wire; it is assigned here by
/// sorting start time then duration then original position, matching
/// `original_source/src/dataloader.py::create_schedule_df`'s
/// `sort_values(["Heure de début", "Heure de fin"])` → `reset_index`.
pub fn order_sessions(records: &[SessionRecord]) -> Vec<(SessionIdx, SessionRecord)> {
    let mut indexed: Vec<(usize, &SessionRecord)> = records.iter().enumerate().collect();
    indexed.sort_by_key(|(pos, rec)| (rec.start_minute, rec.duration_minutes, *pos));
    indexed
        .into_iter()
        .enumerate()
        .map(|(idx, (_, rec))| (SessionIdx(idx), rec.clone()))
        .collect()
}
