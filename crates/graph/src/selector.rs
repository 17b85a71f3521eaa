use crate::path::RelationshipPath;
use std::cmp::Ordering;

/// Ranks candidate paths to one target and picks the canonical one.
///
/// Order, first difference wins:
/// 1. paths without a non-terminal spouse step
/// 2. fewer steps
/// 3. earlier role at the first divergent step (parent < child < spouse)
/// 4. smaller person id at the first divergent step
///
/// Rules 3 and 4 read a path from its own root, so the two ends of a
/// relationship are ranked independently. Double first cousins get mirrored
/// role sequences from either end, yet each side goes up through its own
/// smallest parent.
pub struct RelationshipSelector;

impl RelationshipSelector {
    pub fn compare(a: &RelationshipPath, b: &RelationshipPath) -> Ordering {
        a.crosses_marriage()
            .cmp(&b.crosses_marriage())
            .then_with(|| a.len().cmp(&b.len()))
            .then_with(|| a.roles().cmp(b.roles()))
            .then_with(|| a.persons().cmp(b.persons()))
    }

    pub fn select(candidates: &[RelationshipPath]) -> Option<&RelationshipPath> {
        candidates.iter().min_by(|a, b| Self::compare(a, b))
    }

    /// Sort candidates best first
    pub fn rank(candidates: &mut [RelationshipPath]) {
        candidates.sort_by(Self::compare);
    }
}
