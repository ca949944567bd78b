//! Greedy chain-builder fallback, used when the MILP yields no incumbent
//! (SPEC_FULL.md §4.3). Directly grounded on the teacher's
//! `solver::greedy::Greedy`: caregivers are kept in a `BTreeMap` ordered
//! by `(Reverse(last_end_time), id)` so the search always prefers
//! reusing the caregiver that became free most recently, and falls
//! through to the next-best candidate when the first can't reach the
//! session in time — the same `range(...).find(...)` shape the teacher
//! uses for vehicles and service trips.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use model::base_types::{CaregiverId, LocationId, SessionIdx};
use model::time::Minute;

use instance::Instance;

use crate::{project_assignments, SessionAssignment};

/// Output of the greedy fallback: the same per-session assignment the
/// MILP path produces, plus the chain edges it walked (so
/// [`crate::route`] can reconstruct routes from either solve path
/// uniformly).
pub struct GreedyResult {
    pub assignments: Vec<SessionAssignment>,
    pub edges: Vec<(SessionIdx, SessionIdx, CaregiverId)>,
}

pub fn solve(instance: &Instance) -> GreedyResult {
    let task_set: HashSet<(SessionIdx, CaregiverId)> = instance
        .tasks()
        .iter()
        .map(|t| (t.session, t.caregiver))
        .collect();

    let mut available: BTreeMap<(Reverse<Minute>, CaregiverId), CaregiverId> = BTreeMap::new();
    let mut last_location: HashMap<CaregiverId, LocationId> = HashMap::new();
    let mut last_session: HashMap<CaregiverId, SessionIdx> = HashMap::new();

    for caregiver in instance.caregivers() {
        let home = LocationId::CaregiverHome(caregiver.id());
        available.insert(
            (Reverse(model::time::MORNING_SENTINEL_MINUTE), caregiver.id()),
            caregiver.id(),
        );
        last_location.insert(caregiver.id(), home);
    }
    for &idx in instance.cases() {
        let session = instance.session(idx);
        if let Some(owner) = session.sentinel_owner() {
            if session.start() == model::time::MORNING_SENTINEL_MINUTE {
                last_session.insert(owner, idx);
            }
        }
    }

    let mut assigned: HashSet<(SessionIdx, CaregiverId)> = HashSet::new();
    let mut edges: Vec<(SessionIdx, SessionIdx, CaregiverId)> = Vec::new();

    for &idx in instance.cases() {
        let session = instance.session(idx);
        if session.is_sentinel() {
            continue;
        }
        let start = session.start();
        let location = session.location();

        // Only caregivers whose last session ended at or before `start`
        // are in range; among those, ascending key order visits the one
        // freed most recently first (tightest fit), falling through to
        // the next when it can't reach `location` in time.
        let found = available
            .range((Reverse(start), CaregiverId::from(""))..)
            .find(|&(&(Reverse(last_end), w), _)| {
                task_set.contains(&(idx, w)) && {
                    let travel = instance.travel(last_location[&w], location, w);
                    last_end.0 as i64 + travel.minutes as i64 <= start.0 as i64
                }
            })
            .map(|(&key, &w)| (key, w));

        let Some((old_key, w)) = found else {
            log::warn!("greedy fallback: no caregiver available for session {}", idx);
            continue;
        };

        available.remove(&old_key);
        available.insert((Reverse(session.end()), w), w);
        last_location.insert(w, location);
        assigned.insert((idx, w));

        let prev = last_session.insert(w, idx).expect("caregiver starts with a morning sentinel");
        edges.push((prev, idx, w));
    }

    for &idx in instance.cases() {
        let session = instance.session(idx);
        if session.sentinel_owner().is_some() && session.start() == model::time::EVENING_SENTINEL_MINUTE {
            let w = session.sentinel_owner().unwrap();
            if let Some(&prev) = last_session.get(&w) {
                edges.push((prev, idx, w));
            }
        }
    }

    GreedyResult {
        assignments: project_assignments(instance, &assigned),
        edges,
    }
}
