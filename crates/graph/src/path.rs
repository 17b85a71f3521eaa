use crate::types::{Direction, EdgeRole, PersonId};
use serde::{Deserialize, Serialize};

/// One directed hop: `to` plays `role` relative to `from`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipStep {
    pub from: PersonId,
    pub to: PersonId,
    pub role: EdgeRole,
}

/// How a path relates its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinshipClass {
    /// No spouse step at all
    Blood,
    /// Blood path whose last step is the only spouse step (e.g. an uncle's wife)
    SpouseOfBlood,
    /// A spouse step is followed by further steps
    InLaw,
}

/// Counts derived from a path, for renderers and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinshipSummary {
    pub up: usize,
    pub down: usize,
    /// Generations of the target relative to the root (positive = older)
    pub generation: i64,
    pub spouse_steps: usize,
    /// Pure ancestor or pure descendant line
    pub direct_line: bool,
    pub in_law: bool,
    pub ends_in_spouse: bool,
    pub class: KinshipClass,
}

/// Ordered steps from a root to a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipPath {
    steps: Vec<RelationshipStep>,
}

impl RelationshipPath {
    /// Path of a person to themselves
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<RelationshipStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RelationshipStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True iff any step except the last is a spouse step
    pub fn crosses_marriage(&self) -> bool {
        match self.steps.split_last() {
            Some((_, head)) => head.iter().any(|s| s.role == EdgeRole::Spouse),
            None => false,
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = EdgeRole> + '_ {
        self.steps.iter().map(|s| s.role)
    }

    /// Persons visited after the root, in order
    pub fn persons(&self) -> impl Iterator<Item = &PersonId> + '_ {
        self.steps.iter().map(|s| &s.to)
    }

    pub fn target(&self) -> Option<&PersonId> {
        self.steps.last().map(|s| &s.to)
    }

    /// Number of parent and child steps
    pub fn generation_distance(&self) -> usize {
        self.roles().filter(|r| *r != EdgeRole::Spouse).count()
    }

    /// The same path walked from the target back to the root
    pub fn inverse(&self) -> Self {
        let steps = self
            .steps
            .iter()
            .rev()
            .map(|s| RelationshipStep {
                from: s.to.clone(),
                to: s.from.clone(),
                role: s.role.inverse(),
            })
            .collect();
        Self { steps }
    }

    /// (role, direction) pairs handed to describers
    pub fn segments(&self) -> Vec<(EdgeRole, Direction)> {
        self.roles().map(|r| (r, r.direction())).collect()
    }

    pub fn class(&self) -> KinshipClass {
        if self.crosses_marriage() {
            KinshipClass::InLaw
        } else if self.steps.last().map(|s| s.role) == Some(EdgeRole::Spouse) {
            KinshipClass::SpouseOfBlood
        } else {
            KinshipClass::Blood
        }
    }

    pub fn summary(&self) -> KinshipSummary {
        let up = self.roles().filter(|r| *r == EdgeRole::Parent).count();
        let down = self.roles().filter(|r| *r == EdgeRole::Child).count();
        let spouse_steps = self.len() - up - down;
        let class = self.class();

        KinshipSummary {
            up,
            down,
            generation: up as i64 - down as i64,
            spouse_steps,
            direct_line: spouse_steps == 0 && (up == 0 || down == 0),
            in_law: class == KinshipClass::InLaw,
            ends_in_spouse: self.steps.last().map(|s| s.role) == Some(EdgeRole::Spouse),
            class,
        }
    }
}
