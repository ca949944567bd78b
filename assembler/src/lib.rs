//! Model Assembler (spec.md §4.3): declares the decision variables,
//! parameters, objective and linear constraints for one day's MILP, and
//! applies the big-M disjunctive reformulation for non-overlap. Grounded
//! on `other_examples`' `good_lp`-based MILP crates — the variable-map +
//! constraint-accumulation shape follows
//! `nsg-ethz-Chameleon::decomposition::ilp_scheduler` (`ProblemVariables`,
//! `variable().binary()`, the `constraint!` macro, `SolverModel`'s
//! mutating `add_constraint`), and the minimise/assemble split follows
//! `poliukhovych-unischedule`'s `solver-milp` crate.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use instance::Instance;
use model::base_types::{CaregiverId, SessionIdx, BIG_M, SHORT_GAP_PENALTY, SHORT_GAP_THRESHOLD_MINUTES};

pub type TripleKey = (SessionIdx, SessionIdx, CaregiverId);

/// One disjunction's materialized variable handles (spec.md §4.3
/// "Variables"), plus the big-M branch selector the disjunctive
/// reformulation needs (not one of the spec's named variables; an
/// implementation detail of turning an OR of two inequalities into
/// linear constraints — see DESIGN.md).
#[derive(Copy, Clone, Debug)]
pub struct EdgeVars {
    pub x: Variable,
    pub t: Variable,
    pub d: Variable,
    pub m: Variable,
    order: Variable,
}

/// The assembled, solver-agnostic MILP: a `ProblemVariables` bag, the
/// objective expression, and the full constraint list, plus the `x`
/// variable handles the Solver Driver reads back after solving.
pub struct AssembledModel {
    pub variables: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub edges: HashMap<TripleKey, EdgeVars>,
}

impl AssembledModel {
    pub fn x(&self, key: TripleKey) -> Variable {
        self.edges[&key].x
    }
}

pub fn assemble(instance: &Instance) -> AssembledModel {
    let mut variables = ProblemVariables::new();
    let mut edges = HashMap::with_capacity(instance.disjunctions().len());

    for disjunction in instance.disjunctions() {
        let key = (disjunction.c1, disjunction.c2, disjunction.caregiver);
        edges.insert(
            key,
            EdgeVars {
                x: variables.add(variable().binary()),
                t: variables.add(variable().min(0.0).max(model::time::MINUTES_PER_DAY as f64)),
                d: variables.add(variable().binary()),
                m: variables.add(variable().min(0.0)),
                order: variables.add(variable().binary()),
            },
        );
    }

    let mut objective = Expression::from(0.0);
    let mut constraints = Vec::with_capacity(edges.len() * 5);

    for disjunction in instance.disjunctions() {
        let key = (disjunction.c1, disjunction.c2, disjunction.caregiver);
        let vars = edges[&key];
        add_edge_constraints(instance, disjunction.c1, disjunction.c2, disjunction.caregiver, vars, &mut constraints);
        objective += vars.t;
        objective += SHORT_GAP_PENALTY * vars.d;
        if instance.config().carbon_reduction {
            objective += 0.001 * vars.m;
        }
    }

    add_flow_constraints(instance, &edges, &mut constraints);

    AssembledModel {
        variables,
        objective,
        constraints,
        edges,
    }
}

fn add_edge_constraints(
    instance: &Instance,
    c1: SessionIdx,
    c2: SessionIdx,
    w: CaregiverId,
    vars: EdgeVars,
    constraints: &mut Vec<Constraint>,
) {
    let loc1 = instance.location(c1);
    let loc2 = instance.location(c2);

    let travel_fwd = instance.travel(loc1, loc2, w);
    let travel_bwd = instance.travel(loc2, loc1, w);

    // t[c1,c2,w] = x * travel_min(c1 -> c2, w) (spec.md §4.3 linking constraints)
    let travel_fwd_minutes = travel_fwd.minutes as f64;
    constraints.push(constraint!(vars.t == travel_fwd_minutes * vars.x));

    // m[c1,c2,w] = x * travel_m(c1 -> c2), always the driving table, 0 if w
    // has no car (mode selection rule, spec.md §4.3).
    let meters_const = if instance.has_car(w) {
        instance.travel_driving(loc1, loc2).meters as f64
    } else {
        0.0
    };
    constraints.push(constraint!(vars.m == meters_const * vars.x));

    // d[c1,c2,w] = x * 1[gap < 30] — the indicator is evaluated statically
    // from parameters at build time, never a decision (spec.md §9 "Static
    // indicator for short-idle-gap").
    let gap = instance.start_minute(c2) as i64
        - (instance.start_minute(c1) as i64 + instance.duration_minutes(c1) as i64 + travel_fwd.minutes as i64);
    let indicator = if gap < SHORT_GAP_THRESHOLD_MINUTES as i64 { 1.0 } else { 0.0 };
    constraints.push(constraint!(vars.d == indicator * vars.x));

    // Disjunctive non-overlap: at least one direction holds when x=1,
    // reformulated with big-M and a branch selector `order` (the binary
    // indicator pyomo's gdp.bigm transformation introduces automatically
    // for a two-term disjunction — see original_source's
    // `TransformationFactory("gdp.bigm")`). order=1 means c1 precedes c2.
    let big_m = BIG_M as f64;
    let st1 = instance.start_minute(c1) as f64;
    let dur1 = instance.duration_minutes(c1) as f64;
    let st2 = instance.start_minute(c2) as f64;
    let dur2 = instance.duration_minutes(c2) as f64;
    let travel_bwd_minutes = travel_bwd.minutes as f64;

    constraints.push(constraint!(
        st1 + dur1 + travel_fwd_minutes <= st2 + big_m * (1.0 - vars.x) + big_m * (1.0 - vars.order)
    ));
    constraints.push(constraint!(
        st2 + dur2 + travel_bwd_minutes <= st1 + big_m * (1.0 - vars.x) + big_m * vars.order
    ));
}

/// The five flow-conservation constraint families of spec.md §4.3, built
/// once per (session, caregiver) task rather than per disjunction, since
/// they aggregate edges that share a session endpoint.
fn add_flow_constraints(
    instance: &Instance,
    edges: &HashMap<TripleKey, EdgeVars>,
    constraints: &mut Vec<Constraint>,
) {
    // out_edges[c] / in_edges[c]: all edges touching c as source/destination,
    // irrespective of caregiver, for constraint families 1-3.
    let mut out_edges: HashMap<SessionIdx, Vec<Variable>> = HashMap::new();
    let mut in_edges: HashMap<SessionIdx, Vec<Variable>> = HashMap::new();
    // per (c, w): edges with c as source assigned to w, and as destination
    // assigned to w, for families 4-5.
    let mut out_by_caregiver: HashMap<(SessionIdx, CaregiverId), Vec<Variable>> = HashMap::new();
    let mut in_by_caregiver: HashMap<(SessionIdx, CaregiverId), Vec<Variable>> = HashMap::new();
    // destination edges assigned to some caregiver other than w0, per
    // (destination session, w0) — needed for family 4.
    let mut in_by_other_caregiver: HashMap<(SessionIdx, CaregiverId), Vec<Variable>> = HashMap::new();

    for (&(c1, c2, w), vars) in edges {
        out_edges.entry(c1).or_default().push(vars.x);
        in_edges.entry(c2).or_default().push(vars.x);
        out_by_caregiver.entry((c1, w)).or_default().push(vars.x);
        in_by_caregiver.entry((c2, w)).or_default().push(vars.x);
    }

    let caregiver_ids: Vec<CaregiverId> = instance.caregivers().iter().map(|c| c.id()).collect();
    for (&(_c1, c2, w), vars) in edges {
        for &w0 in &caregiver_ids {
            if w0 != w {
                in_by_other_caregiver.entry((c2, w0)).or_default().push(vars.x);
            }
        }
    }

    for &c in instance.cases() {
        let out_sum = sum_of(out_edges.get(&c));
        let in_sum = sum_of(in_edges.get(&c));

        // 1. out-degree <= 1
        constraints.push(constraint!(out_sum.clone() <= 1.0));
        // 2. in-degree <= 1
        constraints.push(constraint!(in_sum.clone() <= 1.0));
        // 3. covered: out-degree + in-degree >= 1
        constraints.push(constraint!(out_sum + in_sum >= 1.0));
    }

    for task in instance.tasks() {
        let c = task.session;
        let w0 = task.caregiver;

        let out_w0 = sum_of(out_by_caregiver.get(&(c, w0)));
        let in_w0 = sum_of(in_by_caregiver.get(&(c, w0)));
        let in_other = sum_of(in_by_other_caregiver.get(&(c, w0)));

        // 4. single caregiver: out-edges claimed by w0 from c, plus
        // in-edges into c claimed by any caregiver other than w0, <= 1.
        constraints.push(constraint!(out_w0.clone() + in_other <= 1.0));

        // 5. flow balance per caregiver, with sentinels supplying/sinking
        // one unit of flow so the chain has a unique start and end
        // (spec.md §4.3 "sentinel sessions owned by w0 contribute on both
        // sides").
        let session = instance.session(c);
        let supply = if session.sentinel_owner() == Some(w0) {
            if session.start() == model::time::MORNING_SENTINEL_MINUTE {
                1.0
            } else {
                -1.0
            }
        } else {
            0.0
        };
        constraints.push(constraint!(out_w0 - in_w0 == supply));
    }
}

fn sum_of(vars: Option<&Vec<Variable>>) -> Expression {
    match vars {
        Some(vars) => vars.iter().fold(Expression::from(0.0), |acc, &v| acc + v),
        None => Expression::from(0.0),
    }
}
