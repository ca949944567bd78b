use crate::caregiver::TransportPolicy;

/// Configuration options enumerated in spec.md §6.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub include_availability: bool,
    pub transport: TransportPolicy,
    pub filter_for_competence: bool,
    pub carbon_reduction: bool,
    pub time_limit_seconds: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            include_availability: false,
            transport: TransportPolicy::ForceDriving,
            filter_for_competence: false,
            carbon_reduction: false,
            time_limit_seconds: 1_200,
        }
    }
}
