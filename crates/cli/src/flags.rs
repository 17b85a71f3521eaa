use clap::ValueEnum;
use kinship_graph::TraversalScope;
use kinship_names::Sex;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum ScopeFlag {
    Full,
    AncestorsOnly,
}

impl ScopeFlag {
    pub(crate) const fn as_domain(self) -> TraversalScope {
        match self {
            ScopeFlag::Full => TraversalScope::Full,
            ScopeFlag::AncestorsOnly => TraversalScope::AncestorsOnly,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum SexFlag {
    #[value(alias = "m")]
    Male,
    #[value(alias = "f")]
    Female,
}

impl SexFlag {
    pub(crate) const fn as_domain(self) -> Sex {
        match self {
            SexFlag::Male => Sex::Male,
            SexFlag::Female => Sex::Female,
        }
    }
}
