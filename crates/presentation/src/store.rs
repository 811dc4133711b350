//! State holder and one-shot effect channel shared by the screen controllers.

use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;

/// Effects sent while nobody listens are dropped; this bounds what a slow
/// subscriber can lag behind.
const EFFECT_BUFFER: usize = 16;

pub struct Store<S, E> {
    state: watch::Sender<S>,
    effects: broadcast::Sender<E>,
}

impl<S, E> Store<S, E>
where
    S: Clone + Send + Sync + 'static,
    E: Clone + Send + 'static,
{
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        let (effects, _) = broadcast::channel(EFFECT_BUFFER);
        Self { state, effects }
    }

    pub fn current(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn set_state(&self, reduce: impl FnOnce(&mut S)) {
        self.state.send_modify(reduce);
    }

    pub fn set_effect(&self, effect: E) {
        if self.effects.send(effect).is_err() {
            tracing::debug!("dropping effect: no active subscriber");
        }
    }

    pub fn subscribe_state(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<S> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn subscribe_effects(&self) -> broadcast::Receiver<E> {
        self.effects.subscribe()
    }
}
