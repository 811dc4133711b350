use super::*;
use crate::{
    errors::{BAD_REQUEST_MESSAGE, NO_CONNECTION_MESSAGE},
    test_support::{character, details_use_case, settle, wait_for_state, within, FakeRepository},
};
use tokio::sync::broadcast::error::TryRecvError;

fn controller_for(repository: &Arc<FakeRepository>) -> CharacterDetailsController {
    CharacterDetailsController::new(details_use_case(repository))
}

async fn wait_for_character(
    controller: &CharacterDetailsController,
    id: i64,
) -> CharacterDetailsState {
    wait_for_state(controller.subscribe_state(), |s| {
        !s.is_loading && s.character.as_ref().map(|c| c.id.0) == Some(id)
    })
    .await
}

#[tokio::test(start_paused = true)]
async fn invalid_id_is_rejected_without_fetching() {
    let repo = FakeRepository::new();
    let controller = controller_for(&repo);
    let mut effects = controller.subscribe_effects();

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(-5)));
    let state = wait_for_state(controller.subscribe_state(), |s| s.error.is_some()).await;

    assert_eq!(state.error.as_deref(), Some(INVALID_CHARACTER_ID_MESSAGE));
    assert_eq!(state.character, None);
    assert!(!state.is_loading);
    assert_eq!(
        within(effects.recv()).await.expect("effect"),
        CharacterDetailsEffect::ShowMessage(INVALID_CHARACTER_ID_MESSAGE.to_string())
    );
    assert!(repo.detail_calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn sentinel_is_invalid_but_zero_is_fetched() {
    let repo = FakeRepository::new();
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId::INVALID));
    settle().await;
    assert!(repo.detail_calls().await.is_empty());

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(0)));
    let state = wait_for_state(controller.subscribe_state(), |s| {
        !s.is_loading && s.error.as_deref() == Some(BAD_REQUEST_MESSAGE)
    })
    .await;

    assert_eq!(state.character, None);
    assert_eq!(repo.detail_calls().await, vec![CharacterId(0)]);
}

#[tokio::test(start_paused = true)]
async fn init_loads_character() {
    let repo = FakeRepository::new();
    repo.push_details(Ok(character(1, "Rick Sanchez"))).await;
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    let state = wait_for_character(&controller, 1).await;

    assert_eq!(state.error, None);
    assert_eq!(
        state.character.map(|c| c.name),
        Some("Rick Sanchez".to_string())
    );
    assert_eq!(repo.detail_calls().await, vec![CharacterId(1)]);
}

#[tokio::test(start_paused = true)]
async fn repeated_init_for_loaded_id_is_ignored() {
    let repo = FakeRepository::new();
    repo.push_details(Ok(character(1, "Rick Sanchez"))).await;
    let controller = controller_for(&repo);
    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    let before = wait_for_character(&controller, 1).await;

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    settle().await;

    assert_eq!(controller.state(), before);
    assert_eq!(repo.detail_calls().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_previously_shown_character() {
    let repo = FakeRepository::new();
    repo.push_details(Ok(character(1, "Rick Sanchez"))).await;
    repo.push_details(Err(FetchError::Client { status: 404 })).await;
    let controller = controller_for(&repo);
    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    wait_for_character(&controller, 1).await;
    let mut effects = controller.subscribe_effects();

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(2)));
    let state = wait_for_state(controller.subscribe_state(), |s| s.error.is_some()).await;

    assert_eq!(state.error.as_deref(), Some(BAD_REQUEST_MESSAGE));
    assert!(!state.is_loading);
    assert_eq!(state.character.map(|c| c.id), Some(CharacterId(1)));
    assert_eq!(
        within(effects.recv()).await.expect("effect"),
        CharacterDetailsEffect::ShowMessage(BAD_REQUEST_MESSAGE.to_string())
    );
    settle().await;
    assert_eq!(effects.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn retry_refetches_last_requested_id() {
    let repo = FakeRepository::new();
    repo.push_details(Err(FetchError::Connectivity("connection refused".into())))
        .await;
    repo.push_details(Ok(character(3, "Summer Smith"))).await;
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(3)));
    let state = wait_for_state(controller.subscribe_state(), |s| s.error.is_some()).await;
    assert_eq!(state.error.as_deref(), Some(NO_CONNECTION_MESSAGE));

    controller.dispatch(CharacterDetailsEvent::Retry);
    let state = wait_for_character(&controller, 3).await;

    assert_eq!(state.error, None);
    assert_eq!(
        repo.detail_calls().await,
        vec![CharacterId(3), CharacterId(3)]
    );
}

#[tokio::test(start_paused = true)]
async fn retry_without_prior_init_reports_invalid_id() {
    let repo = FakeRepository::new();
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Retry);
    let state = wait_for_state(controller.subscribe_state(), |s| s.error.is_some()).await;

    assert_eq!(state.error.as_deref(), Some(INVALID_CHARACTER_ID_MESSAGE));
    assert!(repo.detail_calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn newer_init_supersedes_in_flight_load() {
    let repo = FakeRepository::new();
    let gate = repo.push_gated_details(character(1, "Rick Sanchez")).await;
    repo.push_details(Ok(character(2, "Morty Smith"))).await;
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    settle().await;
    assert!(controller.state().is_loading);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(2)));
    wait_for_character(&controller, 2).await;
    settle().await;

    assert!(gate.is_closed());
    assert_eq!(
        controller.state().character.map(|c| c.id),
        Some(CharacterId(2))
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_id_cancels_in_flight_load() {
    let repo = FakeRepository::new();
    let gate = repo.push_gated_details(character(1, "Rick Sanchez")).await;
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    settle().await;
    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(-1)));
    let state = wait_for_state(controller.subscribe_state(), |s| s.error.is_some()).await;
    settle().await;

    assert!(!state.is_loading);
    assert_eq!(state.character, None);
    assert!(gate.is_closed());
    assert_eq!(controller.state().character, None);
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_cancels_in_flight_load() {
    let repo = FakeRepository::new();
    let mut gate = repo.push_gated_details(character(1, "Rick Sanchez")).await;
    let controller = controller_for(&repo);

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(1)));
    settle().await;
    drop(controller);

    within(gate.closed()).await;
}
