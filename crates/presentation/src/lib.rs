//! Presentation controllers for the characters list and details screens.
//!
//! Each controller exposes a latest-value state stream, a fire-and-forget
//! `dispatch` for intents and a one-shot effect stream. Collaborators are
//! passed in as use cases; nothing is looked up globally.

pub mod debounce;
pub mod details;
pub mod errors;
pub mod list;
pub mod sorting;
pub mod store;
pub mod task;

pub use details::{
    CharacterDetailsController, CharacterDetailsEffect, CharacterDetailsEvent,
    CharacterDetailsState,
};
pub use list::{
    CharactersListController, CharactersListEffect, CharactersListEvent, CharactersListState,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
