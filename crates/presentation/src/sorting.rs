use std::cmp::Reverse;

use shared::domain::{Character, CharacterSort};

/// Orders `items` for `sort`. Every mode except `None` breaks ties by
/// ascending id; `None` keeps the incoming order.
pub fn sort_characters(mut items: Vec<Character>, sort: CharacterSort) -> Vec<Character> {
    match sort {
        CharacterSort::None => {}
        CharacterSort::NameAsc => {
            items.sort_by_cached_key(|c| (c.name.to_lowercase(), c.id));
        }
        CharacterSort::NameDesc => {
            items.sort_by_cached_key(|c| (Reverse(c.name.to_lowercase()), c.id));
        }
        CharacterSort::CreatedAsc => {
            items.sort_by(|a, b| {
                a.created_at_iso
                    .cmp(&b.created_at_iso)
                    .then(a.id.cmp(&b.id))
            });
        }
        CharacterSort::CreatedDesc => {
            items.sort_by(|a, b| {
                b.created_at_iso
                    .cmp(&a.created_at_iso)
                    .then(a.id.cmp(&b.id))
            });
        }
        CharacterSort::StatusAsc => {
            items.sort_by_key(|c| (c.status.rank(), c.id));
        }
        CharacterSort::SpeciesAsc => {
            items.sort_by_cached_key(|c| (c.species.to_lowercase(), c.id));
        }
    }
    items
}
