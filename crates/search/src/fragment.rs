use crate::error::{Result, SearchError};
use kinship_graph::Identity;
use kinship_names::Sex;
use serde::{Deserialize, Serialize};

/// Query-side description of one person; every field is optional but at
/// least one name component must be present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityFragment {
    pub given: Option<String>,
    pub surname: Option<String>,
    pub sex: Option<Sex>,
    pub also_known_as: Vec<Identity>,
    pub alive: Option<bool>,
    pub birth_year: Option<i32>,
    pub birth_place: Option<String>,
}

impl IdentityFragment {
    pub fn new(given: &str, surname: &str) -> Self {
        Self {
            given: Some(given.to_string()),
            surname: Some(surname.to_string()),
            ..Default::default()
        }
    }

    pub fn surname_only(surname: &str) -> Self {
        Self {
            surname: Some(surname.to_string()),
            ..Default::default()
        }
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn aka(mut self, identity: Identity) -> Self {
        self.also_known_as.push(identity);
        self
    }

    pub fn alive(mut self, alive: bool) -> Self {
        self.alive = Some(alive);
        self
    }

    pub fn born(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn born_in(mut self, place: &str) -> Self {
        self.birth_place = Some(place.to_string());
        self
    }

    /// Primary identity followed by the a.k.a. identities; an a.k.a.
    /// without a sex inherits the fragment's
    pub fn identities(&self) -> Vec<Identity> {
        let primary = Identity {
            given: self.given.clone(),
            surname: self.surname.clone(),
            sex: self.sex,
        };
        std::iter::once(primary)
            .chain(self.also_known_as.iter().map(|aka| Identity {
                sex: aka.sex.or(self.sex),
                ..aka.clone()
            }))
            .collect()
    }

    pub fn has_name(&self) -> bool {
        self.identities().iter().any(|identity| !identity.is_blank())
    }
}

/// Which relative of the searched person a fragment describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeRole {
    Father,
    Mother,
    PaternalGrandfather,
    PaternalGrandmother,
    MaternalGrandfather,
    MaternalGrandmother,
}

impl RelativeRole {
    pub const ALL: [RelativeRole; 6] = [
        RelativeRole::Father,
        RelativeRole::Mother,
        RelativeRole::PaternalGrandfather,
        RelativeRole::PaternalGrandmother,
        RelativeRole::MaternalGrandfather,
        RelativeRole::MaternalGrandmother,
    ];

    /// Sexes of the parents walked from the individual, nearest first
    pub fn lineage(self) -> &'static [Sex] {
        match self {
            RelativeRole::Father => &[Sex::Male],
            RelativeRole::Mother => &[Sex::Female],
            RelativeRole::PaternalGrandfather => &[Sex::Male, Sex::Male],
            RelativeRole::PaternalGrandmother => &[Sex::Male, Sex::Female],
            RelativeRole::MaternalGrandfather => &[Sex::Female, Sex::Male],
            RelativeRole::MaternalGrandmother => &[Sex::Female, Sex::Female],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelativeRole::Father => "father",
            RelativeRole::Mother => "mother",
            RelativeRole::PaternalGrandfather => "paternal grandfather",
            RelativeRole::PaternalGrandmother => "paternal grandmother",
            RelativeRole::MaternalGrandfather => "maternal grandfather",
            RelativeRole::MaternalGrandmother => "maternal grandmother",
        }
    }
}

/// Search request: the individual plus optional parents and grandparents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FamilyQuery {
    pub individual: IdentityFragment,
    pub father: Option<IdentityFragment>,
    pub mother: Option<IdentityFragment>,
    pub paternal_grandfather: Option<IdentityFragment>,
    pub paternal_grandmother: Option<IdentityFragment>,
    pub maternal_grandfather: Option<IdentityFragment>,
    pub maternal_grandmother: Option<IdentityFragment>,
}

impl FamilyQuery {
    pub fn individual(fragment: IdentityFragment) -> Self {
        Self {
            individual: fragment,
            ..Default::default()
        }
    }

    pub fn with_relative(mut self, role: RelativeRole, fragment: IdentityFragment) -> Self {
        *self.slot_mut(role) = Some(fragment);
        self
    }

    pub fn relative(&self, role: RelativeRole) -> Option<&IdentityFragment> {
        match role {
            RelativeRole::Father => self.father.as_ref(),
            RelativeRole::Mother => self.mother.as_ref(),
            RelativeRole::PaternalGrandfather => self.paternal_grandfather.as_ref(),
            RelativeRole::PaternalGrandmother => self.paternal_grandmother.as_ref(),
            RelativeRole::MaternalGrandfather => self.maternal_grandfather.as_ref(),
            RelativeRole::MaternalGrandmother => self.maternal_grandmother.as_ref(),
        }
    }

    /// Relatives present in the query
    pub fn relatives(&self) -> impl Iterator<Item = (RelativeRole, &IdentityFragment)> {
        RelativeRole::ALL
            .into_iter()
            .filter_map(|role| self.relative(role).map(|fragment| (role, fragment)))
    }

    /// Every fragment present must carry a name
    pub fn validate(&self) -> Result<()> {
        if !self.individual.has_name() {
            return Err(SearchError::EmptyQuery);
        }
        for (role, fragment) in self.relatives() {
            if !fragment.has_name() {
                return Err(SearchError::EmptyFragment(role.label()));
            }
        }
        Ok(())
    }

    fn slot_mut(&mut self, role: RelativeRole) -> &mut Option<IdentityFragment> {
        match role {
            RelativeRole::Father => &mut self.father,
            RelativeRole::Mother => &mut self.mother,
            RelativeRole::PaternalGrandfather => &mut self.paternal_grandfather,
            RelativeRole::PaternalGrandmother => &mut self.paternal_grandmother,
            RelativeRole::MaternalGrandfather => &mut self.maternal_grandfather,
            RelativeRole::MaternalGrandmother => &mut self.maternal_grandmother,
        }
    }
}
