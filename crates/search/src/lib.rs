mod config;
mod connection;
mod error;
mod finder;
mod fragment;
mod fuzzy;
mod matcher;

pub use config::SearchConfig;
pub use connection::{ConnectionOutcome, EndpointIssue};
pub use error::{Result, SearchError};
pub use finder::{MatchOutcome, PersonFinder, RankedCandidate, RELATIVE_BONUS};
pub use fragment::{FamilyQuery, IdentityFragment, RelativeRole};
pub use fuzzy::{PlaceScorer, MAX_PLACE_SCORE};
pub use matcher::{classify_keys, keys_match, keys_match_surname_only, MatchKind, NameMatcher};
