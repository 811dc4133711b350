use shared::domain::{Character, CharacterFilters, CharacterId, CharacterSort};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharactersListState {
    pub items: Vec<Character>,
    pub query: String,
    pub filters: CharacterFilters,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub is_loading_more: bool,
    pub can_load_more: bool,
    pub error: Option<String>,
    pub is_empty: bool,
}

impl CharactersListState {
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_refreshing || self.is_loading_more
    }

    pub(crate) fn set_loading(&mut self, load_type: LoadType, loading: bool) {
        self.is_loading = load_type == LoadType::Initial && loading;
        self.is_refreshing = load_type == LoadType::Refresh && loading;
        self.is_loading_more = load_type == LoadType::More && loading;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadType {
    /// First load, or after search/filter/sort changed.
    Initial,
    Refresh,
    More,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharactersListEvent {
    Init,
    SearchChanged(String),
    FilterChanged(CharacterFilters),
    SortChanged(CharacterSort),
    Retry,
    LoadNextPage,
    Refresh,
    OpenDetails(CharacterId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharactersListEffect {
    NavigateToDetails(CharacterId),
    ShowMessage(String),
}
