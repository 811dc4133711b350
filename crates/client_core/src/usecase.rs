//! Single-shot query use cases consumed by the presentation controllers.

use std::sync::Arc;

use shared::{
    domain::{Character, CharacterFilters, CharacterId, PagedCharacters},
    error::FetchError,
};

use crate::repository::CharactersRepository;

#[derive(Clone)]
pub struct GetCharactersPage {
    repository: Arc<dyn CharactersRepository>,
}

impl GetCharactersPage {
    pub fn new(repository: Arc<dyn CharactersRepository>) -> Self {
        Self { repository }
    }

    /// Fetches `page` for `filters`. A non-blank `query` overrides `filters.name`.
    pub async fn call(
        &self,
        query: &str,
        filters: &CharacterFilters,
        page: u32,
    ) -> Result<PagedCharacters, FetchError> {
        let effective = effective_filters(query, filters, page);
        self.repository.get_characters(&effective).await
    }
}

pub fn effective_filters(query: &str, filters: &CharacterFilters, page: u32) -> CharacterFilters {
    let name = if query.trim().is_empty() {
        filters.name.clone()
    } else {
        Some(query.to_string())
    };
    CharacterFilters {
        page,
        name,
        ..filters.clone()
    }
}

#[derive(Clone)]
pub struct GetCharacterDetails {
    repository: Arc<dyn CharactersRepository>,
}

impl GetCharacterDetails {
    pub fn new(repository: Arc<dyn CharactersRepository>) -> Self {
        Self { repository }
    }

    pub async fn call(&self, id: CharacterId) -> Result<Character, FetchError> {
        self.repository.get_character(id).await
    }
}
