//! # Kinship Graph
//!
//! Immutable family graph and relationship resolution.
//!
//! ## Features
//!
//! - **Validated construction** - every parent/child and spouse link must be mirrored
//! - **Surname index** - bounded candidate lookup by normalized surname
//! - **All shortest paths** - every minimal route from a root, per kinship class, kept as a DAG
//! - **Canonical selection** - blood first, then distance, then a fixed total order
//!
//! ## Architecture
//!
//! ```text
//! PersonRecord[]
//!     │
//!     ├──> Graph Builder
//!     │      ├─ Normalize identities into name keys
//!     │      ├─ Index surnames
//!     │      └─ Check relation counterparts
//!     │
//!     ├──> Person Graph (petgraph)
//!     │      ├─ Nodes: persons
//!     │      └─ Edges: parent / child / spouse
//!     │
//!     └──> Relationship Resolver
//!            ├─ BFS over (person, marriage phase)
//!            ├─ Rank routes into each state, layer by layer
//!            ├─ Follow best routes back for one canonical path per person
//!            └─ Enumerate candidate paths lazily on request
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kinship_graph::{GraphBuilder, Identity, PersonRecord, RelationshipResolver, ResolverConfig};
//! use kinship_names::NameNormalizer;
//!
//! let normalizer = NameNormalizer::default();
//! let mut builder = GraphBuilder::new(&normalizer);
//! builder
//!     .add_person(PersonRecord::new("@P@", Identity::new("Juan", "Pérez")).child("@C@"))
//!     .add_person(PersonRecord::new("@C@", Identity::new("Ana", "Pérez")).parent("@P@"));
//! let graph = builder.build().unwrap();
//!
//! let resolution = RelationshipResolver::new(&graph, ResolverConfig::default())
//!     .resolve(&"@C@".into())
//!     .unwrap();
//! assert_eq!(resolution.canonical_for(&"@P@".into()).unwrap().len(), 1);
//! ```

mod builder;
mod config;
mod describe;
mod error;
mod graph;
mod path;
mod resolution;
mod resolver;
mod selector;
mod types;

pub use builder::GraphBuilder;
pub use config::{ResolverConfig, TraversalScope};
pub use describe::{RelationshipDescriber, SegmentDescriber};
pub use error::{GraphError, Result};
pub use path::{KinshipClass, KinshipSummary, RelationshipPath, RelationshipStep};
pub use resolution::{CandidatePaths, Resolution, TreeStats};
pub use resolver::RelationshipResolver;
pub use selector::RelationshipSelector;
pub use types::{Direction, EdgeRole, Identity, Person, PersonGraph, PersonId, PersonRecord, Relation};
