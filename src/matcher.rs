//! Metadata containment matching for search.

use crate::types::{Meta, Value};

/// Check whether `candidate` contains every entry of `query`.
///
/// Keys missing from `query` are ignored. Where both sides hold a mapping the
/// check recurses; anything else must compare equal. An empty query matches
/// every candidate.
pub fn matches(candidate: &Meta, query: &Meta) -> bool {
    query.iter().all(|(key, wanted)| {
        candidate
            .get(key)
            .is_some_and(|found| value_matches(found, wanted))
    })
}

fn value_matches(found: &Value, wanted: &Value) -> bool {
    match (found, wanted) {
        (Value::Mapping(found), Value::Mapping(wanted)) => matches(found, wanted),
        _ => found == wanted,
    }
}
