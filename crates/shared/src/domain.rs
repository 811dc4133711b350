use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(CharacterId);

impl CharacterId {
    /// Ids at or below this value never reach the network.
    pub const INVALID: CharacterId = CharacterId(-1);

    pub fn is_valid(self) -> bool {
        self > Self::INVALID
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
}

impl CharacterStatus {
    pub fn from_api(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("alive") => Self::Alive,
            Some("dead") => Self::Dead,
            _ => Self::Unknown,
        }
    }

    pub fn api_param(self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }

    /// Position used by the status sort: Alive, then Dead, then Unknown.
    pub fn rank(self) -> u8 {
        match self {
            Self::Alive => 0,
            Self::Dead => 1,
            Self::Unknown => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterGender {
    Female,
    Male,
    Genderless,
    Unknown,
}

impl CharacterGender {
    pub fn from_api(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("female") => Self::Female,
            Some("male") => Self::Male,
            Some("genderless") => Self::Genderless,
            _ => Self::Unknown,
        }
    }

    pub fn api_param(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Genderless => "genderless",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    pub kind: String,
    pub gender: CharacterGender,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image_url: String,
    pub episode_urls: Vec<String>,
    pub details_url: String,
    pub created_at_iso: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterSort {
    #[default]
    None,
    NameAsc,
    NameDesc,
    CreatedAsc,
    CreatedDesc,
    StatusAsc,
    SpeciesAsc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterFilters {
    pub page: u32,
    pub name: Option<String>,
    pub status: Option<CharacterStatus>,
    pub species: Option<String>,
    pub kind: Option<String>,
    pub gender: Option<CharacterGender>,
    pub sort: CharacterSort,
}

impl Default for CharacterFilters {
    fn default() -> Self {
        Self {
            page: 1,
            name: None,
            status: None,
            species: None,
            kind: None,
            gender: None,
            sort: CharacterSort::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagedCharacters {
    pub items: Vec<Character>,
    pub next_page: Option<u32>,
    pub total_count: u32,
    pub total_pages: u32,
}
