//! Relations between object instances observed in a frame.
//!
//! A relation is either a binary fact linking two objects through a predicate,
//! or a unary type declaration. Every relation also has a *positional* form,
//! the flat tuple used for ordering and in configuration files:
//!
//! - binary: `(subject, predicate, object)`
//! - unary: `(type, object)`

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A fact about the objects in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Relation {
    /// `object` is an instance of `ty`.
    Unary { object: String, ty: String },
    /// `subject` stands in `predicate` to `object`.
    Binary {
        subject: String,
        predicate: String,
        object: String,
    },
}

impl Relation {
    /// Build a binary relation.
    pub fn binary(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::Binary {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Build a unary type declaration for `object`.
    pub fn unary(object: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::Unary {
            object: object.into(),
            ty: ty.into(),
        }
    }

    /// First positional element: the subject of a binary, the type of a unary.
    ///
    /// Goal-state reconciliation treats two relations with the same head as
    /// statements about the same thing.
    pub fn head(&self) -> &str {
        match self {
            Self::Unary { ty, .. } => ty,
            Self::Binary { subject, .. } => subject,
        }
    }

    /// The positional tuple, in the order relations are sorted by.
    pub fn positional(&self) -> Vec<&str> {
        match self {
            Self::Unary { object, ty } => vec![ty, object],
            Self::Binary {
                subject,
                predicate,
                object,
            } => vec![subject, predicate, object],
        }
    }

    /// Object instance names this relation introduces, in encounter order.
    ///
    /// A unary declaration introduces only its object; its type is a
    /// predicate in the recognizer's vocabulary, not an instance.
    pub fn instances(&self) -> impl Iterator<Item = &str> {
        let (first, second) = match self {
            Self::Unary { object, .. } => (object.as_str(), None),
            Self::Binary {
                subject, object, ..
            } => (subject.as_str(), Some(object.as_str())),
        };
        std::iter::once(first).chain(second)
    }
}

impl Ord for Relation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.positional().cmp(&other.positional())
    }
}

impl PartialOrd for Relation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Writes the predicate form used by the recognizer: `(on A1 B1)`, `(egg C1)`.
impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary { object, ty } => write!(f, "({ty} {object}1)"),
            Self::Binary {
                subject,
                predicate,
                object,
            } => write!(f, "({predicate} {subject}1 {object}1)"),
        }
    }
}

impl TryFrom<Vec<String>> for Relation {
    type Error = String;

    fn try_from(mut parts: Vec<String>) -> Result<Self, Self::Error> {
        match parts.len() {
            2 => {
                let object = parts.pop().unwrap_or_default();
                let ty = parts.pop().unwrap_or_default();
                Ok(Self::Unary { object, ty })
            }
            3 => {
                let object = parts.pop().unwrap_or_default();
                let predicate = parts.pop().unwrap_or_default();
                let subject = parts.pop().unwrap_or_default();
                Ok(Self::Binary {
                    subject,
                    predicate,
                    object,
                })
            }
            n => Err(format!(
                "a relation has 2 or 3 elements, got {n}: {parts:?}"
            )),
        }
    }
}

impl From<Relation> for Vec<String> {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Unary { object, ty } => vec![ty, object],
            Relation::Binary {
                subject,
                predicate,
                object,
            } => vec![subject, predicate, object],
        }
    }
}

/// The relations observed in one video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: u64,
    pub relations: Vec<Relation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_predicate_form() {
        assert_eq!(Relation::binary("A", "on", "B").to_string(), "(on A1 B1)");
        assert_eq!(Relation::unary("C", "egg").to_string(), "(egg C1)");
    }

    #[test]
    fn ordering_follows_positional_tuple() {
        let mut rels = vec![
            Relation::binary("pan", "on", "stove"),
            Relation::unary("egg", "boiled_egg"),
            Relation::binary("bowl", "on", "table"),
            Relation::binary("bowl", "in", "sink"),
        ];
        rels.sort();
        assert_eq!(
            rels,
            vec![
                Relation::unary("egg", "boiled_egg"),
                Relation::binary("bowl", "in", "sink"),
                Relation::binary("bowl", "on", "table"),
                Relation::binary("pan", "on", "stove"),
            ]
        );
    }

    #[test]
    fn shorter_tuple_sorts_before_its_extension() {
        let unary = Relation::unary("on", "A");
        let binary = Relation::binary("A", "on", "B");
        assert!(unary < binary);
    }

    #[test]
    fn head_is_first_positional_element() {
        assert_eq!(Relation::binary("A", "on", "B").head(), "A");
        assert_eq!(Relation::unary("egg", "boiled_egg").head(), "boiled_egg");
    }

    #[test]
    fn instances_skip_unary_type() {
        let unary = Relation::unary("C", "egg");
        let names: Vec<_> = unary.instances().collect();
        assert_eq!(names, vec!["C"]);
        let binary = Relation::binary("A", "on", "B");
        let names: Vec<_> = binary.instances().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn positional_vectors_convert_both_ways() {
        let rel = Relation::try_from(vec!["A".to_string(), "on".into(), "B".into()]).unwrap();
        assert_eq!(rel, Relation::binary("A", "on", "B"));
        let rel = Relation::try_from(vec!["egg".to_string(), "C".into()]).unwrap();
        assert_eq!(rel, Relation::unary("C", "egg"));
        assert!(Relation::try_from(vec!["lonely".to_string()]).is_err());

        let back: Vec<String> = Relation::binary("A", "on", "B").into();
        assert_eq!(back, vec!["A", "on", "B"]);
    }
}
