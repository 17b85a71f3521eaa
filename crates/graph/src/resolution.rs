use crate::path::{KinshipClass, RelationshipPath, RelationshipStep};
use crate::selector::RelationshipSelector;
use crate::types::{EdgeRole, PersonId};
use serde::Serialize;
use std::collections::BTreeMap;

/// One (person, marriage phase) state of the shortest-walk DAG.
///
/// States are stored in breadth-first order, so every predecessor index is
/// smaller than the index of the state it leads to. Index 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathState {
    pub(crate) person: PersonId,
    pub(crate) preds: Vec<(usize, EdgeRole)>,
}

/// Relationships from one root to every person it reaches.
///
/// Holds the canonical path per person plus the shortest-walk DAG the
/// candidates come from; candidates are only materialized on demand since
/// pedigree collapse makes their number grow exponentially with depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    root: PersonId,
    canonical: BTreeMap<PersonId, RelationshipPath>,
    #[serde(skip)]
    states: Vec<PathState>,
    /// Retained terminal states per reached person
    #[serde(skip)]
    terminals: BTreeMap<PersonId, Vec<usize>>,
}

/// Shape of a resolved family tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Reached persons, root excluded
    pub persons: usize,
    pub blood_relatives: usize,
    /// Relatives whose canonical path has a spouse step
    pub in_laws: usize,
    pub ancestor_generations: usize,
    pub descendant_generations: usize,
}

impl Resolution {
    pub(crate) fn new(
        root: PersonId,
        canonical: BTreeMap<PersonId, RelationshipPath>,
        states: Vec<PathState>,
        terminals: BTreeMap<PersonId, Vec<usize>>,
    ) -> Self {
        Self {
            root,
            canonical,
            states,
            terminals,
        }
    }

    pub fn root(&self) -> &PersonId {
        &self.root
    }

    /// Reached persons, root included
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn contains(&self, target: &PersonId) -> bool {
        self.canonical.contains_key(target)
    }

    /// Every retained shortest path to `target`, generated lazily in no
    /// particular order
    pub fn candidates(&self, target: &PersonId) -> Option<CandidatePaths<'_>> {
        let terminals = self.terminals.get(target)?;
        Some(CandidatePaths {
            states: &self.states,
            pending: terminals.iter().rev().copied().collect(),
            stack: Vec::new(),
        })
    }

    /// Number of retained shortest paths to `target`, saturating at
    /// `u64::MAX`
    pub fn candidate_count(&self, target: &PersonId) -> Option<u64> {
        let terminals = self.terminals.get(target)?;
        let mut counts = vec![0u64; self.states.len()];
        for (index, state) in self.states.iter().enumerate() {
            counts[index] = if state.preds.is_empty() {
                1
            } else {
                state
                    .preds
                    .iter()
                    .fold(0u64, |acc, &(pred, _)| acc.saturating_add(counts[pred]))
            };
        }
        Some(
            terminals
                .iter()
                .fold(0u64, |acc, &terminal| acc.saturating_add(counts[terminal])),
        )
    }

    /// Canonical path of every reached person, root included
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, &RelationshipPath)> {
        self.canonical.iter()
    }

    pub fn canonical_for(&self, target: &PersonId) -> Option<&RelationshipPath> {
        self.canonical.get(target)
    }

    /// One canonical path per reached person
    pub fn canonical(&self) -> BTreeMap<PersonId, RelationshipPath> {
        self.canonical.clone()
    }

    /// Most distant canonical relationship; equal lengths fall back to
    /// selector order
    pub fn farthest(&self) -> Option<(&PersonId, &RelationshipPath)> {
        self.relatives().max_by(|(_, a), (_, b)| {
            a.len()
                .cmp(&b.len())
                .then_with(|| RelationshipSelector::compare(b, a))
        })
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (_, path) in self.relatives() {
            stats.persons += 1;
            match path.class() {
                KinshipClass::Blood => stats.blood_relatives += 1,
                KinshipClass::SpouseOfBlood | KinshipClass::InLaw => stats.in_laws += 1,
            }
            if path.roles().all(|r| r == EdgeRole::Parent) {
                stats.ancestor_generations = stats.ancestor_generations.max(path.len());
            }
            if path.roles().all(|r| r == EdgeRole::Child) {
                stats.descendant_generations = stats.descendant_generations.max(path.len());
            }
        }
        stats
    }

    /// Canonical paths of everyone except the root
    fn relatives(&self) -> impl Iterator<Item = (&PersonId, &RelationshipPath)> {
        self.canonical.iter().filter(|(id, _)| **id != self.root)
    }
}

/// Lazy depth-first walk of the shortest-walk DAG, from a target back to the
/// root.
pub struct CandidatePaths<'r> {
    states: &'r [PathState],
    /// Terminal states not walked yet, next one last
    pending: Vec<usize>,
    /// (state, number of its predecessors already tried)
    stack: Vec<(usize, usize)>,
}

impl CandidatePaths<'_> {
    /// Path spelled by the current stack, root first
    fn current(&self) -> RelationshipPath {
        let steps = self
            .stack
            .windows(2)
            .rev()
            .map(|frames| {
                let (state, tried) = frames[0];
                let (pred, role) = self.states[state].preds[tried - 1];
                RelationshipStep {
                    from: self.states[pred].person.clone(),
                    to: self.states[state].person.clone(),
                    role,
                }
            })
            .collect();
        RelationshipPath::from_steps(steps)
    }
}

impl Iterator for CandidatePaths<'_> {
    type Item = RelationshipPath;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(&(state, tried)) = self.stack.last() else {
                let terminal = self.pending.pop()?;
                self.stack.push((terminal, 0));
                continue;
            };

            let preds = &self.states[state].preds;
            if preds.is_empty() {
                let path = self.current();
                self.stack.pop();
                return Some(path);
            }

            if tried < preds.len() {
                let (pred, _) = preds[tried];
                if let Some(top) = self.stack.last_mut() {
                    top.1 += 1;
                }
                self.stack.push((pred, 0));
            } else {
                self.stack.pop();
            }
        }
    }
}
