//! Characters list screen controller.
//!
//! The controller is an actor: [`CharactersListController`] is the handle the
//! view holds, and a spawned task owns the mutable machine. Intents, settled
//! search text and page completions all arrive on one command queue and are
//! applied in order, so state has a single writer.
//!
//! At most one page load is in flight. Starting a load aborts the previous
//! one, and a completion whose generation no longer matches the load slot is
//! dropped before it can touch state.

mod contract;

use std::{sync::Arc, time::Duration};

use client_core::GetCharactersPage;
use shared::{
    domain::{CharacterFilters, CharacterSort, PagedCharacters},
    error::FetchError,
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

pub use contract::{CharactersListEffect, CharactersListEvent, CharactersListState};
pub(crate) use contract::LoadType;

use crate::{
    debounce::debounce_distinct,
    errors::{classify, to_user_message},
    sorting::sort_characters,
    store::Store,
    task::{guarded, TaskSlot},
};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
const SEARCH_BUFFER: usize = 64;

type ListStore = Store<CharactersListState, CharactersListEffect>;

enum ListCommand {
    Event(CharactersListEvent),
    SearchSettled(String),
    PageLoaded {
        generation: u64,
        load_type: LoadType,
        page: u32,
        result: Result<PagedCharacters, FetchError>,
    },
    Shutdown,
}

pub struct CharactersListController {
    commands: mpsc::UnboundedSender<ListCommand>,
    store: Arc<ListStore>,
}

impl CharactersListController {
    /// Spawns the controller on the current tokio runtime.
    pub fn new(get_page: GetCharactersPage) -> Self {
        Self::with_debounce(get_page, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(get_page: GetCharactersPage, search_debounce: Duration) -> Self {
        let store = Arc::new(ListStore::new(CharactersListState::default()));
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (search_tx, search_rx) = mpsc::channel(SEARCH_BUFFER);

        let mut debounce = TaskSlot::default();
        let settled_tx = commands.clone();
        debounce.spawn(move |_| {
            debounce_distinct(search_rx, search_debounce, move |text| {
                settled_tx.send(ListCommand::SearchSettled(text)).is_ok()
            })
        });

        let machine = ListMachine {
            store: Arc::clone(&store),
            get_page,
            commands: commands.clone(),
            search_tx,
            debounce,
            load: TaskSlot::default(),
            current_page: 1,
        };
        tokio::spawn(machine.run(command_rx));

        Self { commands, store }
    }

    pub fn dispatch(&self, event: CharactersListEvent) {
        if self.commands.send(ListCommand::Event(event)).is_err() {
            debug!("list controller closed; dropping intent");
        }
    }

    pub fn state(&self) -> CharactersListState {
        self.store.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CharactersListState> {
        self.store.subscribe_state()
    }

    pub fn state_stream(&self) -> WatchStream<CharactersListState> {
        self.store.state_stream()
    }

    pub fn subscribe_effects(&self) -> broadcast::Receiver<CharactersListEffect> {
        self.store.subscribe_effects()
    }

    /// Cancels the in-flight load and the search pipeline.
    pub fn close(&self) {
        let _ = self.commands.send(ListCommand::Shutdown);
    }
}

impl Drop for CharactersListController {
    fn drop(&mut self) {
        self.close();
    }
}

struct ListMachine {
    store: Arc<ListStore>,
    get_page: GetCharactersPage,
    commands: mpsc::UnboundedSender<ListCommand>,
    search_tx: mpsc::Sender<String>,
    debounce: TaskSlot,
    load: TaskSlot,
    current_page: u32,
}

impl ListMachine {
    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<ListCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                ListCommand::Event(event) => self.handle_event(event),
                ListCommand::SearchSettled(text) => {
                    debug!(query = %text, "search settled");
                    self.reset_and_reload();
                }
                ListCommand::PageLoaded {
                    generation,
                    load_type,
                    page,
                    result,
                } => self.on_page_loaded(generation, load_type, page, result),
                ListCommand::Shutdown => break,
            }
        }

        self.load.cancel();
        self.debounce.cancel();
        debug!("list controller closed");
    }

    fn handle_event(&mut self, event: CharactersListEvent) {
        match event {
            CharactersListEvent::Init | CharactersListEvent::Retry => {
                self.load_page(1, LoadType::Initial)
            }
            CharactersListEvent::SearchChanged(text) => self.on_search_changed(text),
            CharactersListEvent::FilterChanged(filters) => self.on_filters_changed(filters),
            CharactersListEvent::SortChanged(sort) => self.on_sort_changed(sort),
            CharactersListEvent::LoadNextPage => self.load_next_page(),
            CharactersListEvent::Refresh => self.load_page(1, LoadType::Refresh),
            CharactersListEvent::OpenDetails(id) => {
                self.store.set_effect(CharactersListEffect::NavigateToDetails(id));
            }
        }
    }

    fn on_search_changed(&mut self, text: String) {
        self.store.set_state(|s| s.query = text.clone());
        if let Err(err) = self.search_tx.try_send(text) {
            warn!(error = %err, "search input buffer rejected text");
        }
    }

    fn on_filters_changed(&mut self, filters: CharacterFilters) {
        if self.store.read(|s| s.filters == filters) {
            return;
        }
        self.store.set_state(|s| s.filters = filters);
        self.reset_and_reload();
    }

    fn on_sort_changed(&mut self, sort: CharacterSort) {
        if self.store.read(|s| s.filters.sort == sort) {
            return;
        }

        let has_items = self.store.read(|s| !s.items.is_empty());
        self.store.set_state(|s| {
            s.filters.sort = sort;
            if has_items {
                s.items = sort_characters(std::mem::take(&mut s.items), sort);
            }
        });

        if !has_items {
            self.reset_and_reload();
        }
    }

    fn load_next_page(&mut self) {
        if !self.store.read(|s| s.can_load_more && !s.is_busy()) {
            return;
        }
        self.load_page(self.current_page + 1, LoadType::More);
    }

    fn reset_and_reload(&mut self) {
        self.current_page = 1;
        self.load_page(1, LoadType::Initial);
    }

    fn load_page(&mut self, page: u32, load_type: LoadType) {
        if self.load.cancel() {
            debug!(load = ?load_type, "cancelled in-flight page load");
        }
        self.store.set_state(|s| s.set_loading(load_type, true));

        if matches!(load_type, LoadType::Initial | LoadType::Refresh) {
            self.current_page = 1;
        }

        let (query, filters) = self.store.read(|s| (s.query.clone(), s.filters.clone()));
        debug!(page, load = ?load_type, query = %query, "loading characters page");

        let get_page = self.get_page.clone();
        let commands = self.commands.clone();
        self.load.spawn(move |generation| async move {
            let result = guarded(get_page.call(&query, &filters, page)).await;
            let _ = commands.send(ListCommand::PageLoaded {
                generation,
                load_type,
                page,
                result,
            });
        });
    }

    fn on_page_loaded(
        &mut self,
        generation: u64,
        load_type: LoadType,
        page: u32,
        result: Result<PagedCharacters, FetchError>,
    ) {
        if !self.load.finish(generation) {
            debug!(page, load = ?load_type, "discarding superseded page load");
            return;
        }

        match result {
            Ok(paged) => {
                self.store.set_state(|s| {
                    let merged = match load_type {
                        LoadType::Initial | LoadType::Refresh => paged.items,
                        LoadType::More => {
                            let mut items = std::mem::take(&mut s.items);
                            items.extend(paged.items);
                            items
                        }
                    };
                    s.items = sort_characters(merged, s.filters.sort);
                    s.can_load_more = paged.next_page.is_some();
                    s.is_empty = s.items.is_empty();
                    s.error = None;
                    s.set_loading(load_type, false);
                });
                self.current_page = page;
                info!(
                    page,
                    load = ?load_type,
                    total_items = self.store.read(|s| s.items.len()),
                    next_page = ?paged.next_page,
                    "characters page applied"
                );
            }
            Err(err) => {
                let message = to_user_message(&err);
                warn!(
                    page,
                    load = ?load_type,
                    category = ?classify(&err),
                    error = %err,
                    "characters page load failed"
                );
                self.store.set_state(|s| {
                    s.error = Some(message.clone());
                    s.set_loading(load_type, false);
                });
                self.store.set_effect(CharactersListEffect::ShowMessage(message));
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/list_tests.rs"]
mod tests;
