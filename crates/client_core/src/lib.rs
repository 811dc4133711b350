use std::sync::Arc;

pub mod api;
pub mod config;
pub mod repository;
pub mod usecase;

pub use api::{CharacterPageQuery, CharactersApi};
pub use config::{load_settings, ClientSettings};
pub use repository::{CharactersRepository, HttpCharactersRepository};
pub use usecase::{GetCharacterDetails, GetCharactersPage};

/// Use cases wired against the HTTP repository.
#[derive(Clone)]
pub struct UseCases {
    pub characters_page: GetCharactersPage,
    pub character_details: GetCharacterDetails,
}

impl UseCases {
    pub fn from_repository(repository: Arc<dyn CharactersRepository>) -> Self {
        Self {
            characters_page: GetCharactersPage::new(Arc::clone(&repository)),
            character_details: GetCharacterDetails::new(repository),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let api = CharactersApi::new(settings.http_client()?, settings.base_url.clone())
            .with_request_timeout(settings.request_timeout);
        Ok(Self::from_repository(Arc::new(HttpCharactersRepository::new(
            api,
        ))))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
