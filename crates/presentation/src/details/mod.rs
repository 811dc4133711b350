//! Character details screen controller: load, retry and cancel for one id.

mod contract;

use std::sync::Arc;

use client_core::GetCharacterDetails;
use shared::{
    domain::{Character, CharacterId},
    error::FetchError,
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

pub use contract::{CharacterDetailsEffect, CharacterDetailsEvent, CharacterDetailsState};

use crate::{
    errors::{classify, to_user_message, INVALID_CHARACTER_ID_MESSAGE},
    store::Store,
    task::{guarded, TaskSlot},
};

type DetailsStore = Store<CharacterDetailsState, CharacterDetailsEffect>;

enum DetailsCommand {
    Event(CharacterDetailsEvent),
    Loaded {
        generation: u64,
        id: CharacterId,
        result: Result<Character, FetchError>,
    },
    Shutdown,
}

pub struct CharacterDetailsController {
    commands: mpsc::UnboundedSender<DetailsCommand>,
    store: Arc<DetailsStore>,
}

impl CharacterDetailsController {
    /// Spawns the controller on the current tokio runtime.
    pub fn new(get_details: GetCharacterDetails) -> Self {
        let store = Arc::new(DetailsStore::new(CharacterDetailsState::default()));
        let (commands, command_rx) = mpsc::unbounded_channel();

        let machine = DetailsMachine {
            store: Arc::clone(&store),
            get_details,
            commands: commands.clone(),
            current_id: None,
            load: TaskSlot::default(),
        };
        tokio::spawn(machine.run(command_rx));

        Self { commands, store }
    }

    pub fn dispatch(&self, event: CharacterDetailsEvent) {
        if self.commands.send(DetailsCommand::Event(event)).is_err() {
            debug!("details controller closed; dropping intent");
        }
    }

    pub fn state(&self) -> CharacterDetailsState {
        self.store.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CharacterDetailsState> {
        self.store.subscribe_state()
    }

    pub fn state_stream(&self) -> WatchStream<CharacterDetailsState> {
        self.store.state_stream()
    }

    pub fn subscribe_effects(&self) -> broadcast::Receiver<CharacterDetailsEffect> {
        self.store.subscribe_effects()
    }

    pub fn close(&self) {
        let _ = self.commands.send(DetailsCommand::Shutdown);
    }
}

impl Drop for CharacterDetailsController {
    fn drop(&mut self) {
        self.close();
    }
}

struct DetailsMachine {
    store: Arc<DetailsStore>,
    get_details: GetCharacterDetails,
    commands: mpsc::UnboundedSender<DetailsCommand>,
    current_id: Option<CharacterId>,
    load: TaskSlot,
}

impl DetailsMachine {
    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<DetailsCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                DetailsCommand::Event(CharacterDetailsEvent::Init(id)) => self.load_character(id),
                DetailsCommand::Event(CharacterDetailsEvent::Retry) => self.retry(),
                DetailsCommand::Loaded {
                    generation,
                    id,
                    result,
                } => self.on_loaded(generation, id, result),
                DetailsCommand::Shutdown => break,
            }
        }

        if self.load.cancel() {
            debug!("cancelled in-flight character load on teardown");
        }
    }

    fn retry(&mut self) {
        match self.current_id {
            Some(id) if id.is_valid() => self.load_character(id),
            _ => self.reject_invalid_id(),
        }
    }

    fn load_character(&mut self, id: CharacterId) {
        if !id.is_valid() {
            self.reject_invalid_id();
            return;
        }

        let already_loaded = self.current_id == Some(id)
            && self
                .store
                .read(|s| s.character.is_some() && s.error.is_none());
        if already_loaded {
            debug!(character_id = id.0, "character already loaded");
            return;
        }

        self.current_id = Some(id);
        self.load.cancel();
        self.store.set_state(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let get_details = self.get_details.clone();
        let commands = self.commands.clone();
        self.load.spawn(move |generation| async move {
            let result = guarded(get_details.call(id)).await;
            let _ = commands.send(DetailsCommand::Loaded {
                generation,
                id,
                result,
            });
        });
    }

    fn on_loaded(
        &mut self,
        generation: u64,
        id: CharacterId,
        result: Result<Character, FetchError>,
    ) {
        if !self.load.finish(generation) {
            debug!(character_id = id.0, "discarding superseded character load");
            return;
        }

        match result {
            Ok(character) => {
                info!(character_id = id.0, "character details applied");
                self.store.set_state(|s| {
                    s.is_loading = false;
                    s.character = Some(character);
                    s.error = None;
                });
            }
            Err(err) => {
                let message = to_user_message(&err);
                warn!(
                    character_id = id.0,
                    category = ?classify(&err),
                    not_found = err.is_not_found(),
                    error = %err,
                    "character load failed"
                );
                self.fail(message);
            }
        }
    }

    fn reject_invalid_id(&mut self) {
        self.load.cancel();
        let message = INVALID_CHARACTER_ID_MESSAGE.to_string();
        self.store.set_state(|s| {
            s.is_loading = false;
            s.character = None;
            s.error = Some(message.clone());
        });
        self.store.set_effect(CharacterDetailsEffect::ShowMessage(message));
    }

    fn fail(&self, message: String) {
        self.store.set_state(|s| {
            s.is_loading = false;
            s.error = Some(message.clone());
        });
        self.store.set_effect(CharacterDetailsEffect::ShowMessage(message));
    }
}

#[cfg(test)]
#[path = "../tests/details_tests.rs"]
mod tests;
