//! Route reconstruction (SPEC_FULL.md §4.4 addendum): turns the solver's
//! selected-edge set back into each caregiver's ordered chain of
//! sessions, morning sentinel to evening sentinel. Not named by spec.md,
//! which only asks for the per-session assignment; this mirrors the way
//! the teacher's `solution::Tour` reduces a vehicle's connections into a
//! single ordered walk (`solution/src/tour.rs`), adapted here to the
//! sparse selected-edge pairs a disjunctive MILP produces instead of a
//! dense node sequence.

use std::collections::HashMap;

use model::base_types::{CaregiverId, SessionIdx};

use instance::Instance;

/// One caregiver's full daily chain, sentinel to sentinel.
#[derive(Debug, Clone)]
pub struct Route {
    pub caregiver: CaregiverId,
    pub sessions: Vec<SessionIdx>,
}

/// Rebuilds each caregiver's chain from the set of selected
/// `(c1, c2, caregiver)` edges (`x = 1` pairs, from either solve path).
/// Disjunctions are stored with `c1.idx() < c2.idx()`, and session
/// indices are assigned in start-time order (spec.md §4.2 "Deterministic
/// enumeration"), so the lower-idx endpoint always precedes the
/// higher-idx one along a caregiver's chain.
pub fn reconstruct(instance: &Instance, selected: &[(SessionIdx, SessionIdx, CaregiverId)]) -> Vec<Route> {
    let mut successors: HashMap<(CaregiverId, SessionIdx), SessionIdx> = HashMap::new();
    for &(c1, c2, w) in selected {
        successors.insert((w, c1), c2);
    }

    instance
        .caregivers()
        .iter()
        .map(|caregiver| {
            let w = caregiver.id();
            let start = instance
                .cases()
                .iter()
                .copied()
                .find(|&idx| {
                    instance.session(idx).sentinel_owner() == Some(w)
                        && instance.session(idx).start() == model::time::MORNING_SENTINEL_MINUTE
                })
                .expect("every caregiver has a morning sentinel session");

            let mut sessions = vec![start];
            let mut current = start;
            while let Some(&next) = successors.get(&(w, current)) {
                sessions.push(next);
                current = next;
            }

            Route {
                caregiver: w,
                sessions,
            }
        })
        .collect()
}
