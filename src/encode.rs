//! Observation encoding: the predicate-string vocabulary of the recognizer.
//!
//! Offline goal states and online observations go through [`encode`], so the
//! recognizer sees byte-identical grammar from both paths:
//!
//! ```text
//! (A1),(B1),(C1),(on A1 B1),(egg C1)
//! ```
//!
//! Object declarations come first, one per distinct instance in first-seen
//! order, followed by every relation in encounter order.

use std::collections::HashSet;

use crate::normalize::{Groups, apply_groups};
use crate::relation::Relation;

/// Distinct instance names in first-seen order (subject, then object).
pub fn objects<'a>(relations: impl IntoIterator<Item = &'a Relation>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    relations
        .into_iter()
        .flat_map(Relation::instances)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Serialize relations into one comma-joined observation line.
pub fn encode(relations: &[Relation]) -> String {
    let objects = objects(relations);
    let mut parts: Vec<String> = Vec::with_capacity(objects.len() + relations.len());
    parts.extend(objects.iter().map(|name| format!("({name}1)")));
    parts.extend(relations.iter().map(Relation::to_string));
    parts.join(",")
}

/// Normalize a frame's relations and encode them.
pub fn encode_frame(relations: &[Relation], groups: &Groups) -> String {
    encode(&apply_groups(relations, groups))
}
