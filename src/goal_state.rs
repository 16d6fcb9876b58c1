//! Goal states: the terminal relations that define a completed recipe.
//!
//! Each trial of a recipe contributes the relations of its last frame. Trials
//! are reconciled per subject: once two trials disagree about what a subject
//! is related to, every stored relation for that subject is dropped. The
//! newest value never wins; a fact survives only if no trial contradicted it.

use std::collections::BTreeMap;

use crate::encode::encode;
use crate::normalize::{Groups, apply_groups};
use crate::relation::Relation;
use crate::source::RelationSource;

/// Merged goal facts of one recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeAccumulator {
    relations: Vec<Relation>,
    trials: usize,
}

impl RecipeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one trial's end-state relations.
    pub fn merge(&mut self, incoming: &[Relation]) {
        for rel in incoming {
            self.insert(rel);
        }
        self.trials += 1;
    }

    fn insert(&mut self, rel: &Relation) {
        if self.relations.contains(rel) {
            return;
        }
        let conflicted = self
            .relations
            .iter()
            .any(|stored| stored.head() == rel.head());
        if conflicted {
            tracing::debug!(subject = rel.head(), "conflicting goal facts dropped");
            self.relations.retain(|stored| stored.head() != rel.head());
        } else {
            self.relations.push(rel.clone());
        }
    }

    /// Surviving relations, in the order they were first seen.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Number of trials merged so far.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// The goal state in recognizer grammar.
    pub fn encode(&self) -> String {
        encode(&self.relations)
    }
}

/// Builds goal states for every recipe from its trials.
#[derive(Debug, Clone, Default)]
pub struct GoalStateBuilder {
    groups: Groups,
    recipes: BTreeMap<String, RecipeAccumulator>,
}

impl GoalStateBuilder {
    pub fn new(groups: Groups) -> Self {
        Self {
            groups,
            recipes: BTreeMap::new(),
        }
    }

    /// Normalized relations of the last frame of a trial. Earlier frames are
    /// not consulted.
    pub fn goal_relations(&self, trial: &dyn RelationSource) -> Vec<Relation> {
        match trial.last_frame() {
            Some((_, relations)) => apply_groups(relations, &self.groups),
            None => Vec::new(),
        }
    }

    /// Merge one trial into its recipe's goal state.
    pub fn add_trial(&mut self, recipe: &str, trial: &dyn RelationSource) {
        if trial.nb_frames() == 0 {
            tracing::warn!(recipe, "trial has no frames, contributing an empty goal state");
        }
        let relations = self.goal_relations(trial);
        self.add_relations(recipe, &relations);
    }

    /// Merge already-normalized end-state relations into a recipe.
    pub fn add_relations(&mut self, recipe: &str, relations: &[Relation]) {
        self.recipes
            .entry(recipe.to_string())
            .or_default()
            .merge(relations);
    }

    pub fn recipe(&self, name: &str) -> Option<&RecipeAccumulator> {
        self.recipes.get(name)
    }

    /// Recipes in name order.
    pub fn recipes(&self) -> impl Iterator<Item = (&str, &RecipeAccumulator)> {
        self.recipes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One encoded goal state per line, recipes sorted by name.
    pub fn render(&self) -> String {
        self.recipes
            .values()
            .map(|acc| format!("{}\n", acc.encode()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Frame;
    use crate::source::RelationFile;

    fn acc_with(rels: &[Relation]) -> RecipeAccumulator {
        let mut acc = RecipeAccumulator::new();
        acc.merge(rels);
        acc
    }

    #[test]
    fn first_trial_drops_exact_duplicates() {
        let a = Relation::binary("A", "on", "B");
        let acc = acc_with(&[a.clone(), a.clone()]);
        assert_eq!(acc.relations(), &[a]);
    }

    #[test]
    fn disagreement_deletes_subject() {
        let mut acc = acc_with(&[Relation::binary("A", "on", "B")]);
        acc.merge(&[Relation::binary("A", "in", "C")]);
        assert!(acc.relations().is_empty());
        assert_eq!(acc.trials(), 2);
    }

    #[test]
    fn agreement_keeps_single_copy() {
        let a = Relation::binary("A", "on", "B");
        let mut acc = acc_with(&[a.clone()]);
        acc.merge(&[a.clone()]);
        assert_eq!(acc.relations(), &[a]);
    }

    #[test]
    fn conflict_removes_every_relation_of_subject() {
        let mut acc = acc_with(&[
            Relation::binary("A", "on", "B"),
            Relation::binary("C", "in", "D"),
        ]);
        acc.merge(&[
            Relation::binary("A", "in", "B"),
            Relation::binary("E", "in", "F"),
        ]);
        assert_eq!(
            acc.relations(),
            &[
                Relation::binary("C", "in", "D"),
                Relation::binary("E", "in", "F"),
            ]
        );
    }

    #[test]
    fn conflicting_facts_within_one_trial_cancel() {
        let acc = acc_with(&[
            Relation::binary("pan", "on", "stove"),
            Relation::binary("pan", "on", "table"),
        ]);
        assert!(acc.relations().is_empty());
    }

    #[test]
    fn goal_relations_use_last_frame_only() {
        let groups: Groups = [("egg", ["boiled_egg"])].into_iter().collect();
        let builder = GoalStateBuilder::new(groups);
        let trial = RelationFile::from_frames([
            Frame {
                index: 0,
                relations: vec![Relation::binary("pan", "on", "table")],
            },
            Frame {
                index: 9,
                relations: vec![Relation::binary("boiled_egg", "on", "plate")],
            },
        ]);
        assert_eq!(
            builder.goal_relations(&trial),
            vec![
                Relation::binary("egg", "on", "plate"),
                Relation::unary("egg", "boiled_egg"),
            ]
        );
    }

    #[test]
    fn render_sorts_recipes() {
        let mut builder = GoalStateBuilder::new(Groups::new());
        builder.add_relations("omelette", &[Relation::binary("egg", "in", "pan")]);
        builder.add_relations("boiledegg", &[Relation::binary("egg", "on", "plate")]);
        assert_eq!(
            builder.render(),
            "(egg1),(plate1),(on egg1 plate1)\n(egg1),(pan1),(in egg1 pan1)\n"
        );
    }

    #[test]
    fn empty_trial_registers_recipe() {
        let mut builder = GoalStateBuilder::new(Groups::new());
        builder.add_trial("salad", &RelationFile::default());
        assert_eq!(builder.recipe("salad").unwrap().trials(), 1);
        assert_eq!(builder.render(), "\n");
    }
}
