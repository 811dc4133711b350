use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Character, CharacterGender, CharacterId, CharacterStatus, LocationRef, PagedCharacters,
    },
    paging::extract_next_page,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharactersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CharacterPayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPayload {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub gender: String,
    pub origin: LocationPayload,
    pub location: LocationPayload,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPayload {
    pub name: String,
    pub url: String,
}

impl From<LocationPayload> for LocationRef {
    fn from(value: LocationPayload) -> Self {
        Self {
            name: value.name,
            url: value.url,
        }
    }
}

impl From<CharacterPayload> for Character {
    fn from(value: CharacterPayload) -> Self {
        Self {
            id: CharacterId(value.id),
            name: value.name,
            status: CharacterStatus::from_api(Some(&value.status)),
            species: value.species.unwrap_or_default(),
            kind: value.kind.unwrap_or_default(),
            gender: CharacterGender::from_api(Some(&value.gender)),
            origin: value.origin.into(),
            location: value.location.into(),
            image_url: value.image,
            episode_urls: value.episode,
            details_url: value.url,
            created_at_iso: value.created,
        }
    }
}

impl From<CharactersResponse> for PagedCharacters {
    fn from(value: CharactersResponse) -> Self {
        let items = value
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Character::from)
            .collect();

        match value.info {
            Some(info) => Self {
                items,
                next_page: extract_next_page(info.next.as_deref()),
                total_count: info.count,
                total_pages: info.pages,
            },
            None => Self {
                items,
                next_page: None,
                total_count: 0,
                total_pages: 0,
            },
        }
    }
}
