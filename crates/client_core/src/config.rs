use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";
const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            connect_timeout: Duration::from_millis(15_000),
            read_timeout: Duration::from_millis(15_000),
            request_timeout: Duration::from_millis(30_000),
            search_debounce: Duration::from_millis(400),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    connect_timeout_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
}

impl ClientSettings {
    pub fn http_client(&self) -> anyhow::Result<Client> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .user_agent(concat!("character-browser/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build character api http client")
    }
}

pub fn load_settings() -> ClientSettings {
    let file = load_settings_file(Path::new(SETTINGS_FILE));
    apply_overrides(
        ClientSettings::default(),
        file.as_deref(),
        |key| std::env::var(key).ok(),
    )
}

fn load_settings_file(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Layers `client.toml` content and then environment values over `settings`.
pub fn apply_overrides(
    mut settings: ClientSettings,
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.base_url {
                    settings.base_url = v;
                }
                if let Some(v) = file_cfg.connect_timeout_ms {
                    settings.connect_timeout = Duration::from_millis(v);
                }
                if let Some(v) = file_cfg.read_timeout_ms {
                    settings.read_timeout = Duration::from_millis(v);
                }
                if let Some(v) = file_cfg.request_timeout_ms {
                    settings.request_timeout = Duration::from_millis(v);
                }
                if let Some(v) = file_cfg.search_debounce_ms {
                    settings.search_debounce = Duration::from_millis(v);
                }
            }
            Err(err) => tracing::warn!(error = %err, "ignoring malformed {SETTINGS_FILE}"),
        }
    }

    if let Some(v) = env("CHARACTERS_API_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env_millis(&env, "APP__CONNECT_TIMEOUT_MS") {
        settings.connect_timeout = v;
    }
    if let Some(v) = env_millis(&env, "APP__READ_TIMEOUT_MS") {
        settings.read_timeout = v;
    }
    if let Some(v) = env_millis(&env, "APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout = v;
    }
    if let Some(v) = env_millis(&env, "APP__SEARCH_DEBOUNCE_MS") {
        settings.search_debounce = v;
    }

    settings
}

fn env_millis(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    env(key)?.trim().parse::<u64>().ok().map(Duration::from_millis)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
