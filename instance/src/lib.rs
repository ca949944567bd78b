//! Instance Builder (spec.md §4.2): reduces a day's raw inputs into the
//! five artifacts the Model Assembler consumes — `CASES`, `CAREGIVERS`,
//! `DISJUNCTIONS`, `TASKS`, `CASE_COMBINATIONS` — plus the parameter
//! accessors (`DUR`, `ST`, `CLIENT`, `HAS_CAR`, travel lookups) the
//! Assembler reads them through. Grounded on the teacher's
//! `model::network::Network` (deterministic sorted construction,
//! `can_reach`-style feasibility filtering) and on
//! `original_source/src/optimiser.py`'s `_generate_disjunctions` /
//! `_generate_tasks`, whose triple-nested filters this mirrors directly.


use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;

use model::base_types::{CaregiverId, LocationId, ServiceTag, SessionIdx};
use model::caregiver::{Caregiver, TransportMode};
use model::config::RunConfig;
use model::error::{CoreError, CoreResult};
use model::json_serialisation::DayInput;
use model::session::Session;
use model::{client::Client, service_tag};

use oracle::{Travel, TravelOracle};

/// A candidate (session₁, session₂, caregiver) triple, `c1 <= c2`
/// (spec.md §4.2 `DISJUNCTIONS`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Disjunction {
    pub c1: SessionIdx,
    pub c2: SessionIdx,
    pub caregiver: CaregiverId,
}

/// A candidate (session, caregiver) pair (spec.md §4.2 `TASKS`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub session: SessionIdx,
    pub caregiver: CaregiverId,
}

/// Everything the Model Assembler needs for one day, already filtered and
/// deterministically ordered.
pub struct Instance {
    day_of_month: u8,
    config: RunConfig,
    sessions: Vec<Session>,
    cases: Vec<SessionIdx>,
    caregivers: Vec<Caregiver>,
    caregivers_by_id: HashMap<CaregiverId, Caregiver>,
    disjunctions: Vec<Disjunction>,
    tasks: Vec<Task>,
    case_combinations: Vec<(SessionIdx, SessionIdx)>,
    oracle: Arc<TravelOracle>,
}

impl Instance {
    pub fn build(
        input: &DayInput,
        oracle: Arc<TravelOracle>,
        config: &RunConfig,
    ) -> CoreResult<Instance> {
        if input.caregivers.is_empty() {
            return Err(CoreError::MissingInput {
                day: input.day_of_month,
                detail: "no caregivers on the roster".to_string(),
            });
        }

        let clients = model::json_serialisation::build_clients(input);
        let clients_by_id: HashMap<_, _> = clients.iter().map(|c| (c.id(), *c)).collect();

        let mut caregivers = model::json_serialisation::build_caregivers(input);
        caregivers.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        if config.include_availability {
            caregivers.retain(|c| c.is_available_on(input.day_of_month));
        }
        if caregivers.is_empty() {
            return Err(CoreError::MissingInput {
                day: input.day_of_month,
                detail: "no caregiver is available on this day".to_string(),
            });
        }

        let sessions = build_sessions(input, &caregivers, &clients_by_id)?;
        let cases: Vec<SessionIdx> = sessions.iter().map(Session::idx).collect();

        let caregivers_by_id: HashMap<CaregiverId, Caregiver> =
            caregivers.iter().map(|c| (c.id(), c.clone())).collect();

        let (disjunctions, tasks) = generate_candidates(&sessions, &caregivers, config);
        let case_combinations = case_combinations(&disjunctions);

        Ok(Instance {
            day_of_month: input.day_of_month,
            config: config.clone(),
            sessions,
            cases,
            caregivers,
            caregivers_by_id,
            disjunctions,
            tasks,
            case_combinations,
            oracle,
        })
    }

    pub fn day_of_month(&self) -> u8 {
        self.day_of_month
    }

    pub fn cases(&self) -> &[SessionIdx] {
        &self.cases
    }

    pub fn caregivers(&self) -> &[Caregiver] {
        &self.caregivers
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn case_combinations(&self) -> &[(SessionIdx, SessionIdx)] {
        &self.case_combinations
    }

    pub fn session(&self, idx: SessionIdx) -> &Session {
        &self.sessions[idx.0]
    }

    /// `DUR[c]` in minutes.
    pub fn duration_minutes(&self, idx: SessionIdx) -> u16 {
        self.session(idx).duration().0
    }

    /// `ST[c]`, minute of day.
    pub fn start_minute(&self, idx: SessionIdx) -> u16 {
        self.session(idx).start().0
    }

    /// `CLIENT[c]`.
    pub fn location(&self, idx: SessionIdx) -> LocationId {
        self.session(idx).location()
    }

    pub fn service_tag(&self, idx: SessionIdx) -> ServiceTag {
        self.session(idx).service_tag()
    }

    /// `HAS_CAR[w]` under the run's transport policy.
    pub fn has_car(&self, caregiver: CaregiverId) -> bool {
        self.caregivers_by_id
            .get(&caregiver)
            .map(|c| c.drives_under(self.config.transport))
            .unwrap_or(false)
    }

    /// Travel minutes/meters from `src` to `dst` under `w`'s active
    /// transport mode (spec.md §4.3 "Mode selection rule": driving if
    /// `HAS_CAR[w]`, else bicycling).
    pub fn travel(&self, src: LocationId, dst: LocationId, caregiver: CaregiverId) -> Travel {
        let mode = if self.has_car(caregiver) {
            TransportMode::Driving
        } else {
            TransportMode::Bicycling
        };
        self.oracle.lookup(src, dst, mode)
    }

    /// Driving-only travel, used for the carbon-reduction meters term
    /// regardless of the caregiver's actual mode (spec.md §4.3 `μ_drive`
    /// is always the driving table; bicycling contributes 0 meters).
    pub fn travel_driving(&self, src: LocationId, dst: LocationId) -> Travel {
        self.oracle.lookup(src, dst, TransportMode::Driving)
    }

    pub fn oracle(&self) -> &TravelOracle {
        &self.oracle
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

fn build_sessions(
    input: &DayInput,
    caregivers: &[Caregiver],
    clients_by_id: &HashMap<model::base_types::ClientId, Client>,
) -> CoreResult<Vec<Session>> {
    struct Pending {
        location: LocationId,
        start: model::time::Minute,
        duration: model::time::Duration,
        service_tag: ServiceTag,
        original_pos: usize,
    }

    let mut pending = Vec::with_capacity(input.sessions.len() + caregivers.len() * 2);

    for (pos, record) in input.sessions.iter().enumerate() {
        if service_tag::is_administrative(&record.service_tag) {
            continue;
        }
        let client = clients_by_id
            .get(&model::base_types::ClientId::from(&record.client_id))
            .ok_or_else(|| CoreError::MissingInput {
                day: input.day_of_month,
                detail: format!("session references unknown client {}", record.client_id),
            })?;
        pending.push(Pending {
            location: LocationId::Client(client.id()),
            start: record.start(),
            duration: record.duration(),
            service_tag: service_tag::canonicalize(&record.service_tag),
            original_pos: pos,
        });
    }

    let first_sentinel_pos = pending.len();
    for (caregiver_pos, caregiver) in caregivers.iter().enumerate() {
        pending.push(Pending {
            location: LocationId::CaregiverHome(caregiver.id()),
            start: model::time::MORNING_SENTINEL_MINUTE,
            duration: model::time::Duration::zero(),
            service_tag: service_tag::commute_tag(),
            original_pos: first_sentinel_pos + caregiver_pos * 2,
        });
        pending.push(Pending {
            location: LocationId::CaregiverHome(caregiver.id()),
            start: model::time::EVENING_SENTINEL_MINUTE,
            duration: model::time::Duration::zero(),
            service_tag: service_tag::commute_tag(),
            original_pos: first_sentinel_pos + caregiver_pos * 2 + 1,
        });
    }

    // stable sort: (start, duration) with ties broken by original
    // insertion position, matching `dataloader.py::create_schedule_df`'s
    // `sort_values(...).reset_index()` (spec.md §9 "Deterministic
    // enumeration").
    pending.sort_by_key(|p| (p.start, p.duration, p.original_pos));

    Ok(pending
        .into_iter()
        .enumerate()
        .map(|(idx, p)| Session::new(SessionIdx(idx), p.location, p.start, p.duration, p.service_tag))
        .collect())
}

fn generate_candidates(
    sessions: &[Session],
    caregivers: &[Caregiver],
    config: &RunConfig,
) -> (Vec<Disjunction>, Vec<Task>) {
    let mut disjunctions = Vec::new();
    let mut tasks = Vec::new();

    for c in sessions {
        for w in caregivers {
            if task_feasible(c, w, config) {
                tasks.push(Task {
                    session: c.idx(),
                    caregiver: w.id(),
                });
            }
        }
    }

    // strictly c1 < c2: an equal pair would be a self-loop edge that,
    // for zero-duration sentinels, trivially satisfies both the
    // out-degree and in-degree sums from a single variable and lets the
    // chain invariant (spec.md §8 property 3) be bypassed. The spec's
    // "c1 <= c2, enumerated only once" is about not duplicating the
    // symmetric (c2,c1) pair, which strict inequality achieves without
    // the loophole.
    for c1 in sessions {
        for c2 in sessions.iter().filter(|c2| c2.idx() > c1.idx()) {
            for w in caregivers {
                if pair_feasible(c1, c2, w, config) {
                    disjunctions.push(Disjunction {
                        c1: c1.idx(),
                        c2: c2.idx(),
                        caregiver: w.id(),
                    });
                }
            }
        }
    }

    (disjunctions, tasks)
}

fn task_feasible(c: &Session, w: &Caregiver, config: &RunConfig) -> bool {
    let sentinel_ok = match c.sentinel_owner() {
        Some(owner) => owner == w.id(),
        None => true,
    };
    sentinel_ok && (!config.filter_for_competence || w.is_competent_for(c.service_tag()))
}

fn pair_feasible(c1: &Session, c2: &Session, w: &Caregiver, config: &RunConfig) -> bool {
    let sentinel_ok = match (c1.sentinel_owner(), c2.sentinel_owner()) {
        (Some(o1), Some(o2)) => o1 == w.id() && o2 == w.id(),
        (Some(o1), None) => o1 == w.id(),
        (None, Some(o2)) => o2 == w.id(),
        (None, None) => true,
    };
    let competence_ok = !config.filter_for_competence
        || (w.is_competent_for(c1.service_tag()) && w.is_competent_for(c2.service_tag()));
    sentinel_ok && competence_ok
}

/// Projects `DISJUNCTIONS` onto `(c1, c2)` pairs, irrespective of
/// caregiver (spec.md §4.2 `CASE_COMBINATIONS`), deduplicated and sorted
/// for determinism.
fn case_combinations(disjunctions: &[Disjunction]) -> Vec<(SessionIdx, SessionIdx)> {
    disjunctions
        .iter()
        .map(|d| (d.c1, d.c2))
        .sorted()
        .dedup()
        .collect()
}
