use std::{any::Any, future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use shared::error::FetchError;
use tokio::task::JoinHandle;

/// Holds at most one spawned task. Spawning into the slot aborts the previous
/// task and bumps the generation, so completions from it can be told apart.
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl TaskSlot {
    pub fn spawn<F>(&mut self, make: impl FnOnce(u64) -> F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        self.handle = Some(tokio::spawn(make(generation)));
        generation
    }

    /// Returns true when a task was running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the slot if `generation` is the live task; false for stale completions.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && self.generation == generation {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs a fetch, turning a panic into an `Unexpected` failure.
pub async fn guarded<T, F>(fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(FetchError::Unexpected(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}
