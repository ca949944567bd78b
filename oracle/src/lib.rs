//! Travel Oracle (spec.md §4.1): a pure lookup service for travel minutes
//! and meters between any two locations (clients or caregiver homes),
//! keyed by transport mode. Grounded on the teacher's
//! `model::locations::Locations`/`DeadHeadTrip` pairwise table, generalized
//! from a single "driving" distance matrix to the mode-keyed lookup the
//! spec requires.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use model::base_types::{LocationId, Meter};
use model::caregiver::TransportMode;
use model::json_serialisation::TravelEdgeRecord;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Travel {
    pub minutes: u32,
    pub meters: Meter,
}

impl Travel {
    pub const ZERO: Travel = Travel {
        minutes: 0,
        meters: 0,
    };
}

/// Built once per run from the per-mode pairwise tables over
/// `{caregivers ∪ clients} × {caregivers ∪ clients}` (spec.md
/// "Construction"). Deterministic and side-effect-free for the life of a
/// run; safe to share read-only across day-workers behind an `Arc`.
pub struct TravelOracle {
    edges: HashMap<(LocationId, LocationId, TransportMode), Travel>,
    /// count of lookups that fell back to the zero-substitution default
    /// because no edge was on file — surfaces the §7 "missing travel
    /// edge" failure mode to callers who want to sanity-check a result.
    missing_lookups: AtomicU64,
}

impl TravelOracle {
    pub fn build(records: &[TravelEdgeRecord], locations_by_id: &LocationsById) -> TravelOracle {
        let mut edges = HashMap::with_capacity(records.len());
        for record in records {
            let (Some(source), Some(destination)) = (
                locations_by_id.resolve(&record.source_id),
                locations_by_id.resolve(&record.destination_id),
            ) else {
                log::warn!(
                    "travel edge references unknown location: {} -> {}",
                    record.source_id,
                    record.destination_id
                );
                continue;
            };
            let mode = match record.mode {
                model::json_serialisation::TravelModeRecord::Driving => TransportMode::Driving,
                model::json_serialisation::TravelModeRecord::Bicycling => {
                    TransportMode::Bicycling
                }
            };
            edges.insert(
                (source, destination, mode),
                Travel {
                    minutes: record.seconds / 60,
                    meters: record.meters,
                },
            );
        }

        // self-loops, including caregiver-to-own-home, are always free
        // (spec.md §4.1 "Construction": "Caregiver-to-own-self edges are
        // inserted with (0, 0) to support sentinel sessions").
        for &location in locations_by_id.all() {
            for mode in [TransportMode::Driving, TransportMode::Bicycling] {
                edges.insert((location, location, mode), Travel::ZERO);
            }
        }

        TravelOracle {
            edges,
            missing_lookups: AtomicU64::new(0),
        }
    }

    /// `lookup(src, dst, mode) -> (minutes, meters)`. Missing entries
    /// default to `(0, 0)` with a logged diagnostic; the oracle never
    /// fails the optimization (spec.md §4.1 "Contract").
    pub fn lookup(&self, src: LocationId, dst: LocationId, mode: TransportMode) -> Travel {
        if src == dst {
            return Travel::ZERO;
        }
        match self.edges.get(&(src, dst, mode)) {
            Some(travel) => *travel,
            None => {
                log::warn!(
                    "missing travel edge {:?} -> {:?} ({:?}); substituting (0, 0)",
                    src,
                    dst,
                    mode
                );
                self.missing_lookups.fetch_add(1, Ordering::Relaxed);
                Travel::ZERO
            }
        }
    }

    /// Number of lookups that had to fall back to the zero-substitution
    /// default this run. A non-zero count means the incumbent may be
    /// infeasible in reality even though it satisfied the MILP (spec.md §7).
    pub fn missing_lookup_count(&self) -> u64 {
        self.missing_lookups.load(Ordering::Relaxed)
    }
}

/// Resolves the string ids on the wire (`TravelEdgeRecord::source_id`,
/// `destination_id`) to the `LocationId` the rest of the core uses.
pub struct LocationsById {
    by_id: HashMap<String, LocationId>,
}

impl LocationsById {
    pub fn new(
        clients: impl Iterator<Item = model::base_types::ClientId>,
        caregivers: impl Iterator<Item = model::base_types::CaregiverId>,
    ) -> LocationsById {
        let mut by_id = HashMap::new();
        for client in clients {
            by_id.insert(client.to_string(), LocationId::Client(client));
        }
        for caregiver in caregivers {
            by_id.insert(caregiver.to_string(), LocationId::CaregiverHome(caregiver));
        }
        LocationsById { by_id }
    }

    pub fn resolve(&self, id: &str) -> Option<LocationId> {
        self.by_id.get(id).copied()
    }

    pub fn all(&self) -> impl Iterator<Item = &LocationId> {
        self.by_id.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::base_types::{CaregiverId, ClientId};
    use model::json_serialisation::TravelModeRecord;

    fn locations() -> LocationsById {
        LocationsById::new(
            vec![ClientId::from("client-1")].into_iter(),
            vec![CaregiverId::from("caregiver-1")].into_iter(),
        )
    }

    #[test]
    fn self_loop_is_always_zero() {
        let oracle = TravelOracle::build(&[], &locations());
        let client = LocationId::Client(ClientId::from("client-1"));
        assert_eq!(
            oracle.lookup(client, client, TransportMode::Driving),
            Travel::ZERO
        );
    }

    #[test]
    fn missing_edge_substitutes_zero_and_counts() {
        let oracle = TravelOracle::build(&[], &locations());
        let client = LocationId::Client(ClientId::from("client-1"));
        let home = LocationId::CaregiverHome(CaregiverId::from("caregiver-1"));
        assert_eq!(
            oracle.lookup(client, home, TransportMode::Driving),
            Travel::ZERO
        );
        assert_eq!(oracle.missing_lookup_count(), 1);
    }

    #[test]
    fn known_edge_is_returned_verbatim() {
        let records = vec![TravelEdgeRecord {
            source_id: "client-1".into(),
            destination_id: "caregiver-1".into(),
            mode: TravelModeRecord::Driving,
            seconds: 600,
            meters: 3_000,
        }];
        let oracle = TravelOracle::build(&records, &locations());
        let client = LocationId::Client(ClientId::from("client-1"));
        let home = LocationId::CaregiverHome(CaregiverId::from("caregiver-1"));
        let travel = oracle.lookup(client, home, TransportMode::Driving);
        assert_eq!(travel.minutes, 10);
        assert_eq!(travel.meters, 3_000);
        assert_eq!(oracle.missing_lookup_count(), 0);
    }
}
