use crate::utilities::CopyStr;

pub type CaregiverId = CopyStr<20>;
pub type ClientId = CopyStr<20>;
pub type ServiceTag = CopyStr<32>;

pub type Meter = u64;
pub type Cost = f32;

/// Index of a session within a single day's instance. Sessions are not
/// stable across days (spec.md: "id (index within day)").
#[derive(Hash, Eq, PartialEq, Copy, Clone, PartialOrd, Ord, Debug)]
pub struct SessionIdx(pub usize);

impl std::fmt::Display for SessionIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Either a client's location or a caregiver's home, whichever a session's
/// `client_id` field resolves to.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum LocationId {
    Client(ClientId),
    CaregiverHome(CaregiverId),
}

/// big-M constant: 10^3 * 1440, strictly larger than any temporal quantity
/// a single day's schedule can produce (spec.md §4.3).
pub const BIG_M: i64 = 1_000 * 1_440;

pub const SHORT_GAP_THRESHOLD_MINUTES: i32 = 30;
pub const SHORT_GAP_PENALTY: f64 = 5.0;
