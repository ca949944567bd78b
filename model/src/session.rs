use crate::base_types::{CaregiverId, LocationId, ServiceTag, SessionIdx};
use crate::service_tag;
use crate::time::{Duration, Minute, EVENING_SENTINEL_MINUTE, MORNING_SENTINEL_MINUTE};

/// A single scheduled service at a client location (or a caregiver-home
/// sentinel) on this day. Immutable once built by the Instance Builder
/// (spec.md §3 "Lifecycles").
#[derive(Clone, Copy, Debug)]
pub struct Session {
    idx: SessionIdx,
    location: LocationId,
    start: Minute,
    duration: Duration,
    service_tag: ServiceTag,
}

impl Session {
    pub fn new(
        idx: SessionIdx,
        location: LocationId,
        start: Minute,
        duration: Duration,
        service_tag: ServiceTag,
    ) -> Session {
        assert!(
            start.0 as u32 + duration.0 as u32 <= 1_440,
            "session {} runs past midnight",
            idx
        );
        Session {
            idx,
            location,
            start,
            duration,
            service_tag,
        }
    }

    /// The two sentinel sessions anchoring `caregiver`'s chain for the day:
    /// morning at 5:00 and evening at 22:00, duration 0, tag COMMUTE,
    /// location = caregiver's own home (spec.md §3, §4.2 "Sentinel
    /// injection").
    pub fn sentinels(
        morning_idx: SessionIdx,
        evening_idx: SessionIdx,
        caregiver: CaregiverId,
    ) -> (Session, Session) {
        let morning = Session::new(
            morning_idx,
            LocationId::CaregiverHome(caregiver),
            MORNING_SENTINEL_MINUTE,
            Duration::zero(),
            service_tag::commute_tag(),
        );
        let evening = Session::new(
            evening_idx,
            LocationId::CaregiverHome(caregiver),
            EVENING_SENTINEL_MINUTE,
            Duration::zero(),
            service_tag::commute_tag(),
        );
        (morning, evening)
    }

    pub fn idx(&self) -> SessionIdx {
        self.idx
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn start(&self) -> Minute {
        self.start
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn end(&self) -> Minute {
        self.start + self.duration
    }

    pub fn service_tag(&self) -> ServiceTag {
        self.service_tag
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.location, LocationId::CaregiverHome(_))
    }

    /// The sentinel's owning caregiver, if this session is a sentinel.
    pub fn sentinel_owner(&self) -> Option<CaregiverId> {
        match self.location {
            LocationId::CaregiverHome(c) => Some(c),
            LocationId::Client(_) => None,
        }
    }
}
