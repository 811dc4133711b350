mod render;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client_core::{load_settings, ClientSettings, UseCases};
use presentation::{
    CharacterDetailsController, CharacterDetailsEffect, CharacterDetailsEvent,
    CharacterDetailsState, CharactersListController, CharactersListEffect, CharactersListEvent,
    CharactersListState,
};
use shared::domain::{
    CharacterFilters, CharacterGender, CharacterId, CharacterSort, CharacterStatus,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Grace period for a dispatched intent to show up as a running load.
const START_GRACE: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(about = "Browse characters from the command line")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the character list, optionally filtered, searched and sorted.
    List(ListArgs),
    /// Show one character.
    Details {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        /// Retry once if the first load fails.
        #[arg(long)]
        retry: bool,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,
    #[arg(long)]
    species: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long, value_enum, default_value = "none")]
    sort: SortArg,
    /// Number of pages to accumulate.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Alive,
    Dead,
    Unknown,
}

impl From<StatusArg> for CharacterStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Alive => CharacterStatus::Alive,
            StatusArg::Dead => CharacterStatus::Dead,
            StatusArg::Unknown => CharacterStatus::Unknown,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Female,
    Male,
    Genderless,
    Unknown,
}

impl From<GenderArg> for CharacterGender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Female => CharacterGender::Female,
            GenderArg::Male => CharacterGender::Male,
            GenderArg::Genderless => CharacterGender::Genderless,
            GenderArg::Unknown => CharacterGender::Unknown,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    None,
    NameAsc,
    NameDesc,
    CreatedAsc,
    CreatedDesc,
    StatusAsc,
    SpeciesAsc,
}

impl From<SortArg> for CharacterSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::None => CharacterSort::None,
            SortArg::NameAsc => CharacterSort::NameAsc,
            SortArg::NameDesc => CharacterSort::NameDesc,
            SortArg::CreatedAsc => CharacterSort::CreatedAsc,
            SortArg::CreatedDesc => CharacterSort::CreatedDesc,
            SortArg::StatusAsc => CharacterSort::StatusAsc,
            SortArg::SpeciesAsc => CharacterSort::SpeciesAsc,
        }
    }
}

impl ListArgs {
    fn filters(&self) -> CharacterFilters {
        CharacterFilters {
            status: self.status.map(Into::into),
            gender: self.gender.map(Into::into),
            species: self.species.clone(),
            kind: self.kind.clone(),
            ..CharacterFilters::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    info!(base_url = %settings.base_url, "using character api");
    let use_cases = UseCases::from_settings(&settings)?;

    match cli.command {
        Command::List(args) => run_list(&settings, use_cases, args).await,
        Command::Details { id, retry } => run_details(&settings, use_cases, id, retry).await,
    }
}

async fn run_list(settings: &ClientSettings, use_cases: UseCases, args: ListArgs) -> Result<()> {
    let controller = CharactersListController::with_debounce(
        use_cases.characters_page,
        settings.search_debounce,
    );
    let printer = print_effects(controller.subscribe_effects(), |effect| match effect {
        CharactersListEffect::ShowMessage(message) => Some(message),
        CharactersListEffect::NavigateToDetails(_) => None,
    });
    let mut state_rx = controller.subscribe_state();
    let limit = settings.request_timeout + START_GRACE;

    let filters = args.filters();
    if filters == CharacterFilters::default() {
        controller.dispatch(CharactersListEvent::Init);
    } else {
        controller.dispatch(CharactersListEvent::FilterChanged(filters));
    }
    let mut state = settle(&mut state_rx, CharactersListState::is_busy, START_GRACE, limit).await?;
    println!("{}", render::list_state(&state));

    if let Some(search) = args.search {
        controller.dispatch(CharactersListEvent::SearchChanged(search));
        state = settle(
            &mut state_rx,
            CharactersListState::is_busy,
            settings.search_debounce + START_GRACE,
            limit,
        )
        .await?;
        println!("{}", render::list_state(&state));
    }

    for _ in 1..args.pages {
        if !state.can_load_more {
            debug!("no further pages");
            break;
        }
        controller.dispatch(CharactersListEvent::LoadNextPage);
        state = settle(&mut state_rx, CharactersListState::is_busy, START_GRACE, limit).await?;
        println!("{}", render::list_state(&state));
    }

    let sort = CharacterSort::from(args.sort);
    if sort != CharacterSort::None {
        controller.dispatch(CharactersListEvent::SortChanged(sort));
        let sorted = state_rx.wait_for(|s| s.filters.sort == sort && !s.is_busy());
        state = tokio::time::timeout(limit, sorted)
            .await
            .context("timed out waiting for sorted list")?
            .context("list controller stopped")?
            .clone();
        println!("{}", render::list_state(&state));
    }

    drop(controller);
    finish_printer(printer).await;
    Ok(())
}

async fn run_details(
    settings: &ClientSettings,
    use_cases: UseCases,
    id: i64,
    retry: bool,
) -> Result<()> {
    let controller = CharacterDetailsController::new(use_cases.character_details);
    let printer = print_effects(controller.subscribe_effects(), |effect| match effect {
        CharacterDetailsEffect::ShowMessage(message) => Some(message),
    });
    let mut state_rx = controller.subscribe_state();
    let limit = settings.request_timeout + START_GRACE;

    controller.dispatch(CharacterDetailsEvent::Init(CharacterId(id)));
    let mut state = settle(&mut state_rx, details_loading, START_GRACE, limit).await?;

    if retry && state.error.is_some() {
        info!(character_id = id, "retrying character load");
        controller.dispatch(CharacterDetailsEvent::Retry);
        state = settle(&mut state_rx, details_loading, START_GRACE, limit).await?;
    }
    println!("{}", render::details_state(&state));

    drop(controller);
    finish_printer(printer).await;
    Ok(())
}

fn details_loading(state: &CharacterDetailsState) -> bool {
    state.is_loading
}

/// Waits for a dispatched load to start and finish, returning the settled state.
///
/// A load that completes before it is observed running is covered by the
/// grace period: the state is idle by then and already final.
async fn settle<S: Clone>(
    rx: &mut watch::Receiver<S>,
    busy: fn(&S) -> bool,
    grace: Duration,
    limit: Duration,
) -> Result<S> {
    if tokio::time::timeout(grace, rx.wait_for(busy)).await.is_err() {
        debug!("load not observed running; using current state");
        return Ok(rx.borrow().clone());
    }
    let state = tokio::time::timeout(limit, rx.wait_for(|s| !busy(s)))
        .await
        .context("timed out waiting for load to finish")?
        .context("controller stopped")?
        .clone();
    Ok(state)
}

fn print_effects<E>(
    mut effects: broadcast::Receiver<E>,
    message: impl Fn(E) -> Option<String> + Send + 'static,
) -> JoinHandle<()>
where
    E: Clone + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match effects.recv().await {
                Ok(effect) => {
                    if let Some(text) = message(effect) {
                        println!("! {text}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "effect printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn finish_printer(printer: JoinHandle<()>) {
    if tokio::time::timeout(START_GRACE, printer).await.is_err() {
        debug!("effect printer still running at exit");
    }
}
