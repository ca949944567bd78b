use std::collections::HashSet;

use crate::base_types::{CaregiverId, ServiceTag};
use crate::service_tag;

/// Whether a caregiver drives or relies on a bicycle, under the transport
/// policy currently in effect (spec.md §4.3 "Mode selection rule").
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TransportMode {
    Driving,
    Bicycling,
}

#[derive(Clone, Debug)]
pub struct Caregiver {
    id: CaregiverId,
    home_lat: f64,
    home_lon: f64,
    has_personal_vehicle: bool,
    has_license: bool,
    competence: HashSet<ServiceTag>,
    unavailable_days: HashSet<u8>,
}

impl Caregiver {
    pub fn new(
        id: CaregiverId,
        home_lat: f64,
        home_lon: f64,
        has_personal_vehicle: bool,
        has_license: bool,
        competence: HashSet<ServiceTag>,
        unavailable_days: HashSet<u8>,
    ) -> Caregiver {
        assert!(!competence.is_empty(), "competence set must be non-empty");
        Caregiver {
            id,
            home_lat,
            home_lon,
            has_personal_vehicle,
            has_license,
            competence,
            unavailable_days,
        }
    }

    pub fn id(&self) -> CaregiverId {
        self.id
    }

    pub fn home_coordinates(&self) -> (f64, f64) {
        (self.home_lat, self.home_lon)
    }

    pub fn has_personal_vehicle(&self) -> bool {
        self.has_personal_vehicle
    }

    pub fn has_license(&self) -> bool {
        self.has_license
    }

    /// Competence check after canonicalizing `tag` (COMMUTE is implicitly
    /// in every caregiver's competence set, spec.md §4.2).
    pub fn is_competent_for(&self, tag: ServiceTag) -> bool {
        tag == service_tag::commute_tag() || self.competence.contains(&tag)
    }

    pub fn is_available_on(&self, day_of_month: u8) -> bool {
        !self.unavailable_days.contains(&day_of_month)
    }

    /// Whether this caregiver drives, under the given transport policy.
    /// `driving` forces true for everyone; `license` defers to the
    /// caregiver's own license flag (spec.md §6 `transport` option).
    pub fn drives_under(&self, policy: TransportPolicy) -> bool {
        match policy {
            TransportPolicy::ForceDriving => true,
            TransportPolicy::ByLicense => self.has_license,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TransportPolicy {
    ForceDriving,
    ByLicense,
}

pub fn transport_mode_for(has_car: bool) -> TransportMode {
    if has_car {
        TransportMode::Driving
    } else {
        TransportMode::Bicycling
    }
}
