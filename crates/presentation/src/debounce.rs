use std::time::Duration;

use tokio::sync::mpsc;

/// Re-emits a value once `input` has been quiet for `quiet` and the value
/// differs from the last one emitted. Stops when `input` closes or `emit`
/// returns false.
pub async fn debounce_distinct<T, F>(mut input: mpsc::Receiver<T>, quiet: Duration, mut emit: F)
where
    T: Clone + PartialEq,
    F: FnMut(T) -> bool,
{
    let mut last_emitted: Option<T> = None;

    while let Some(mut pending) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = value,
                    None => return,
                },
                () = tokio::time::sleep(quiet) => break,
            }
        }

        if last_emitted.as_ref() == Some(&pending) {
            continue;
        }
        last_emitted = Some(pending.clone());
        if !emit(pending) {
            return;
        }
    }
}
