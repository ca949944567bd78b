use thiserror::Error;

/// Error taxonomy from spec.md §7. "Missing travel edge" deliberately has
/// no variant here: it is non-fatal and handled entirely inside the Travel
/// Oracle (substitution + logged diagnostic), never surfaced as a
/// `CoreError`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("day {day}: missing or unreadable input ({detail})")]
    MissingInput { day: u8, detail: String },

    #[error("day {day}: no feasible assignment respects non-overlap under the solver's budget")]
    InfeasibleDay { day: u8 },

    #[error("day {day}: solver budget of {budget_secs}s expired with no incumbent")]
    TimeoutNoIncumbent { day: u8, budget_secs: u32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
