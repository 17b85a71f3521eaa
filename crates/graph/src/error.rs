use crate::types::{EdgeRole, PersonId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate person: {0}")]
    DuplicatePerson(PersonId),

    #[error("Relation from {from} points to unknown person {to}")]
    DanglingRelation { from: PersonId, to: PersonId },

    #[error("Person {0} is related to itself")]
    SelfRelation(PersonId),

    #[error("Relation {from} -> {to} ({role}) is listed twice")]
    DuplicateRelation {
        from: PersonId,
        to: PersonId,
        role: EdgeRole,
    },

    #[error("Relation {from} -> {to} ({role}) has no {expected} counterpart on {to}")]
    MissingCounterpart {
        from: PersonId,
        to: PersonId,
        role: EdgeRole,
        expected: EdgeRole,
    },

    #[error("Person not found: {0}")]
    UnknownPerson(PersonId),
}
