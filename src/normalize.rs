//! Group normalization: collapse object variants onto a canonical label.
//!
//! A group such as `egg = ["shell_egg", "boiled_egg"]` makes every variant
//! look like one object to the recognizer. Rewriting `(shell_egg, in, bowl)`
//! yields `(egg, in, bowl)` plus the membership fact `(shell_egg egg1)`, which
//! declares the canonical instance `egg1` to be of type `shell_egg`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::relation::Relation;

/// Canonical label -> variant names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups(BTreeMap<String, BTreeSet<String>>);

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add variants to a group, creating it if needed.
    pub fn insert<I, S>(&mut self, canonical: impl Into<String>, variants: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(canonical.into())
            .or_default()
            .extend(variants.into_iter().map(Into::into));
    }

    /// Whether `name` is a canonical group label.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Variant -> canonical lookup. A variant listed in several groups maps to
    /// the first label in sorted order.
    fn index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for (canonical, variants) in &self.0 {
            for variant in variants {
                index.entry(variant.as_str()).or_insert(canonical.as_str());
            }
        }
        index
    }
}

impl<K, V, S> FromIterator<(K, V)> for Groups
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut groups = Self::new();
        for (canonical, variants) in iter {
            groups.insert(canonical, variants);
        }
        groups
    }
}

/// Rewrite grouped variants to their canonical label.
///
/// Each rewritten endpoint appends one membership fact after all input
/// relations, in encounter order. Names outside every group pass through, and
/// membership facts themselves are left as they are, so normalizing
/// normalized relations changes nothing.
pub fn apply_groups(relations: &[Relation], groups: &Groups) -> Vec<Relation> {
    if groups.is_empty() {
        return relations.to_vec();
    }
    let index = groups.index();
    let mut membership = Vec::new();
    let mut canon = |name: &str| -> String {
        match index.get(name) {
            Some(&canonical) => {
                membership.push(Relation::unary(canonical, name));
                canonical.to_string()
            }
            None => name.to_string(),
        }
    };

    let mut out = Vec::with_capacity(relations.len());
    for rel in relations {
        let rewritten = match rel {
            Relation::Unary { object, ty } if index.get(ty.as_str()) == Some(&object.as_str()) => {
                rel.clone()
            }
            Relation::Unary { object, ty } => Relation::Unary {
                object: canon(object),
                ty: canon(ty),
            },
            Relation::Binary {
                subject,
                predicate,
                object,
            } => Relation::Binary {
                subject: canon(subject),
                predicate: predicate.clone(),
                object: canon(object),
            },
        };
        out.push(rewritten);
    }
    out.extend(membership);
    out
}
