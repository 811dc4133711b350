use async_trait::async_trait;
use shared::{
    domain::{Character, CharacterFilters, CharacterId, PagedCharacters},
    error::FetchError,
};
use tracing::info;

use crate::api::{CharacterPageQuery, CharactersApi};

#[async_trait]
pub trait CharactersRepository: Send + Sync {
    async fn get_characters(&self, filters: &CharacterFilters)
        -> Result<PagedCharacters, FetchError>;
    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError>;
}

pub struct HttpCharactersRepository {
    api: CharactersApi,
}

impl HttpCharactersRepository {
    pub fn new(api: CharactersApi) -> Self {
        Self { api }
    }
}

pub fn page_query(filters: &CharacterFilters) -> CharacterPageQuery {
    CharacterPageQuery {
        page: filters.page,
        name: filters.name.clone(),
        status: filters.status.map(|status| status.api_param()),
        species: filters.species.clone(),
        kind: filters.kind.clone(),
        gender: filters.gender.map(|gender| gender.api_param()),
    }
}

#[async_trait]
impl CharactersRepository for HttpCharactersRepository {
    async fn get_characters(
        &self,
        filters: &CharacterFilters,
    ) -> Result<PagedCharacters, FetchError> {
        let response = self.api.fetch_character_page(&page_query(filters)).await?;
        let paged = PagedCharacters::from(response);
        info!(
            page = filters.page,
            items = paged.items.len(),
            next_page = ?paged.next_page,
            total = paged.total_count,
            "loaded character page"
        );
        Ok(paged)
    }

    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError> {
        let character = Character::from(self.api.fetch_character(id).await?);
        info!(character_id = id.0, name = %character.name, "loaded character");
        Ok(character)
    }
}
