use crate::path::RelationshipPath;
use crate::types::{Direction, EdgeRole, PersonGraph};

/// Renders a canonical path into a label.
///
/// Implementors live with the presentation layer; the graph crate only hands
/// over the path and read access to the persons it visits.
pub trait RelationshipDescriber {
    type Output;

    fn describe(&self, path: &RelationshipPath, graph: &PersonGraph) -> Self::Output;
}

/// Bare (role, direction) sequence, useful for machine consumers and tests
pub struct SegmentDescriber;

impl RelationshipDescriber for SegmentDescriber {
    type Output = Vec<(EdgeRole, Direction)>;

    fn describe(&self, path: &RelationshipPath, _graph: &PersonGraph) -> Self::Output {
        path.segments()
    }
}
