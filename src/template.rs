//! Problem-definition templates for the recognizer.
//!
//! The template lists every object, the initial facts, and a `<HYPOTHESIS>`
//! placeholder that the recognizer later fills with each candidate goal.

use std::collections::HashSet;

use crate::encode;
use crate::normalize::{Groups, apply_groups};
use crate::relation::Relation;

/// Goal placeholder substituted downstream.
pub const HYPOTHESIS: &str = "<HYPOTHESIS>";

/// Builds a problem template from one authoritative set of initial relations.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    pub problem: String,
    pub domain: String,
    objects: Vec<String>,
    relations: Vec<Relation>,
}

impl TemplateBuilder {
    pub fn new(problem: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            domain: domain.into(),
            objects: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Declared objects, listed before any discovered from relations.
    pub fn with_objects<I, S>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objects.extend(objects.into_iter().map(Into::into));
        self
    }

    /// Initial relations, normalized against `groups`.
    pub fn with_relations(mut self, relations: &[Relation], groups: &Groups) -> Self {
        self.relations.extend(apply_groups(relations, groups));
        self
    }

    /// Declared objects followed by every other referenced instance.
    pub fn objects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.objects
            .iter()
            .map(String::as_str)
            .chain(encode::objects(&self.relations))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Render the template. Canonical group labels get no self-typing fact.
    pub fn render(&self, groups: &Groups) -> String {
        let objects = self.objects();
        let mut sorted: Vec<&Relation> = self.relations.iter().collect();
        sorted.sort();

        let mut out = String::new();
        out.push_str(&format!("(define (problem {})\n", self.problem));
        out.push_str(&format!("(:domain {})\n", self.domain));

        out.push_str("(:objects\n");
        for obj in &objects {
            out.push_str(&format!("  {obj}1\n"));
        }
        out.push_str(")\n");

        out.push_str("(:init\n");
        for obj in objects.iter().filter(|o| !groups.is_canonical(o)) {
            out.push_str(&format!("  ({obj} {obj}1)\n"));
        }
        for rel in sorted {
            out.push_str(&format!("  {rel}\n"));
        }
        out.push_str(")\n");

        out.push_str("(:goal (and\n");
        out.push_str(&format!("  {HYPOTHESIS}\n"));
        out.push_str("))\n)");
        out
    }
}
