//! Scripted repository and helpers shared by the controller tests.

use std::{collections::VecDeque, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use client_core::{CharactersRepository, GetCharacterDetails, GetCharactersPage};
use shared::{
    domain::{
        Character, CharacterFilters, CharacterGender, CharacterId, CharacterStatus, LocationRef,
        PagedCharacters,
    },
    error::FetchError,
};
use tokio::sync::{oneshot, watch, Mutex};

pub(crate) enum Reply<T> {
    Ready(Result<T, FetchError>),
    Gated(oneshot::Receiver<()>, Result<T, FetchError>),
    Panic(&'static str),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, FetchError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(gate, result) => {
                let _ = gate.await;
                result
            }
            Reply::Panic(message) => panic!("{message}"),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeRepository {
    pages: Mutex<VecDeque<Reply<PagedCharacters>>>,
    page_calls: Mutex<Vec<CharacterFilters>>,
    details: Mutex<VecDeque<Reply<Character>>>,
    detail_calls: Mutex<Vec<CharacterId>>,
}

impl FakeRepository {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn push_page(&self, result: Result<PagedCharacters, FetchError>) {
        self.pages.lock().await.push_back(Reply::Ready(result));
    }

    /// Queues a page that is only returned once the returned sender fires or drops.
    pub(crate) async fn push_gated_page(&self, paged: PagedCharacters) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.pages.lock().await.push_back(Reply::Gated(rx, Ok(paged)));
        tx
    }

    pub(crate) async fn push_panicking_page(&self, message: &'static str) {
        self.pages.lock().await.push_back(Reply::Panic(message));
    }

    pub(crate) async fn push_details(&self, result: Result<Character, FetchError>) {
        self.details.lock().await.push_back(Reply::Ready(result));
    }

    pub(crate) async fn push_gated_details(&self, character: Character) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.details
            .lock()
            .await
            .push_back(Reply::Gated(rx, Ok(character)));
        tx
    }

    pub(crate) async fn page_calls(&self) -> Vec<CharacterFilters> {
        self.page_calls.lock().await.clone()
    }

    pub(crate) async fn detail_calls(&self) -> Vec<CharacterId> {
        self.detail_calls.lock().await.clone()
    }
}

#[async_trait]
impl CharactersRepository for FakeRepository {
    async fn get_characters(
        &self,
        filters: &CharacterFilters,
    ) -> Result<PagedCharacters, FetchError> {
        self.page_calls.lock().await.push(filters.clone());
        let reply = self.pages.lock().await.pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(PagedCharacters::default()),
        }
    }

    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError> {
        self.detail_calls.lock().await.push(id);
        let reply = self.details.lock().await.pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(FetchError::Client { status: 404 }),
        }
    }
}

pub(crate) fn page_use_case(repository: &Arc<FakeRepository>) -> GetCharactersPage {
    GetCharactersPage::new(Arc::clone(repository) as Arc<dyn CharactersRepository>)
}

pub(crate) fn details_use_case(repository: &Arc<FakeRepository>) -> GetCharacterDetails {
    GetCharacterDetails::new(Arc::clone(repository) as Arc<dyn CharactersRepository>)
}

pub(crate) fn character(id: i64, name: &str) -> Character {
    Character {
        id: CharacterId(id),
        name: name.to_string(),
        status: CharacterStatus::Alive,
        species: "Human".into(),
        kind: String::new(),
        gender: CharacterGender::Male,
        origin: LocationRef {
            name: "Earth (C-137)".into(),
            url: "https://rickandmortyapi.com/api/location/1".into(),
        },
        location: LocationRef {
            name: "Citadel of Ricks".into(),
            url: "https://rickandmortyapi.com/api/location/3".into(),
        },
        image_url: format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        episode_urls: vec!["https://rickandmortyapi.com/api/episode/1".into()],
        details_url: format!("https://rickandmortyapi.com/api/character/{id}"),
        created_at_iso: format!("2017-11-04T18:48:{:02}.000Z", id % 60),
    }
}

pub(crate) fn page(items: Vec<Character>, next_page: Option<u32>) -> PagedCharacters {
    let total = items.len() as u32;
    PagedCharacters {
        items,
        next_page,
        total_count: total,
        total_pages: next_page.map_or(1, |next| next),
    }
}

pub(crate) fn ids(items: &[Character]) -> Vec<i64> {
    items.iter().map(|c| c.id.0).collect()
}

/// Lets every ready task run; with a paused clock this advances 1ms.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub(crate) async fn within<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out waiting for controller")
}

pub(crate) async fn wait_for_state<S: Clone>(
    mut rx: watch::Receiver<S>,
    predicate: impl FnMut(&S) -> bool,
) -> S {
    within(async move {
        let state = rx
            .wait_for(predicate)
            .await
            .expect("controller state sender dropped")
            .clone();
        state
    })
    .await
}
