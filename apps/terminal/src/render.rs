//! Plain-text rendering of controller state.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use presentation::{CharacterDetailsState, CharactersListState};
use shared::domain::Character;

pub fn list_state(state: &CharactersListState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "characters: {} shown, more pages: {}, query: {:?}, sort: {:?}",
        state.items.len(),
        if state.can_load_more { "yes" } else { "no" },
        state.query,
        state.filters.sort,
    );
    for character in &state.items {
        let _ = writeln!(out, "  {}", list_row(character));
    }
    if state.is_empty {
        let _ = writeln!(out, "  (no characters)");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "error: {error}");
    }
    out.trim_end().to_string()
}

fn list_row(character: &Character) -> String {
    format!(
        "#{:<5} {:<32} {:<8} {:<12} created {}",
        character.id.0,
        character.name,
        format!("{:?}", character.status),
        character.species,
        created_at(&character.created_at_iso),
    )
}

pub fn details_state(state: &CharacterDetailsState) -> String {
    let mut out = String::new();
    if let Some(character) = &state.character {
        let _ = writeln!(out, "#{} {}", character.id, character.name);
        let _ = writeln!(out, "  status:   {:?}", character.status);
        let _ = writeln!(out, "  species:  {}", character.species);
        if !character.kind.is_empty() {
            let _ = writeln!(out, "  type:     {}", character.kind);
        }
        let _ = writeln!(out, "  gender:   {:?}", character.gender);
        let _ = writeln!(out, "  origin:   {}", character.origin.name);
        let _ = writeln!(out, "  location: {}", character.location.name);
        let _ = writeln!(out, "  episodes: {}", character.episode_urls.len());
        let _ = writeln!(out, "  image:    {}", character.image_url);
        let _ = writeln!(out, "  created:  {}", created_at(&character.created_at_iso));
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "error: {error}");
    }
    if out.is_empty() {
        out.push_str("(nothing loaded)");
    }
    out.trim_end().to_string()
}

/// Creation timestamps are shown in UTC when parseable, raw otherwise.
pub fn created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
