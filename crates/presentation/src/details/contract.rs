use shared::domain::{Character, CharacterId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterDetailsState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub character: Option<Character>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterDetailsEvent {
    Init(CharacterId),
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterDetailsEffect {
    ShowMessage(String),
}
