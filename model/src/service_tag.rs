use crate::base_types::ServiceTag;

/// Sessions tagged with one of these are filtered out before indexing
/// (spec.md §4.2, confirmed against `dataloader.py`'s `discard_list`).
pub const ADMINISTRATIVE_TAGS: &[&str] = &[
    "ADMINISTRATION",
    "VISITE MEDICALE",
    "FORMATION",
    "COORDINATION",
    "HOMMES TOUTES MAINS",
];

/// Synthetic tag used by sentinel sessions, implicitly in every
/// caregiver's competence set.
pub const COMMUTE_TAG: &str = "COMMUTE";

pub fn is_administrative(raw_tag: &str) -> bool {
    ADMINISTRATIVE_TAGS.contains(&raw_tag)
}

/// `"ACCOMPAGNEMENTS COURSES PA"` canonicalizes to `"ACCOMPAGNEMENTS
/// COURSES"` before any competence comparison (spec.md §4.2).
pub fn canonicalize(raw_tag: &str) -> ServiceTag {
    if raw_tag == "ACCOMPAGNEMENTS COURSES PA" {
        ServiceTag::from("ACCOMPAGNEMENTS COURSES")
    } else {
        ServiceTag::from(raw_tag)
    }
}

pub fn commute_tag() -> ServiceTag {
    ServiceTag::from(COMMUTE_TAG)
}
