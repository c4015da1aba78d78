use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use client_core::{
    SearchEndpoint, SessionConfig, StaleResponsePolicy, DEFAULT_ENDPOINT, DEFAULT_SEARCH_TERM,
    SEARCH_TERM_KEY,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "hacker_stories.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub database_url: String,
    pub storage_key: String,
    pub default_search_term: String,
    pub stale_responses: StaleResponsePolicy,
    pub request_timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            database_url: "sqlite://./data/hacker_stories.db".into(),
            storage_key: SEARCH_TERM_KEY.into(),
            default_search_term: DEFAULT_SEARCH_TERM.into(),
            stale_responses: StaleResponsePolicy::default(),
            request_timeout_seconds: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    database_url: Option<String>,
    storage_key: Option<String>,
    default_search_term: Option<String>,
    stale_responses: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Flags that override file and environment settings.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub database_url: Option<String>,
    pub stale_responses: Option<String>,
}

impl Settings {
    pub fn session_config(&self) -> Result<SessionConfig> {
        Ok(SessionConfig {
            endpoint: SearchEndpoint::new(&self.endpoint)?,
            storage_key: self.storage_key.clone(),
            default_search_term: self.default_search_term.clone(),
            stale_responses: self.stale_responses,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

/// Defaults, then the config file, then environment variables, then command-line flags.
///
/// An explicitly named config file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if required => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |name| std::env::var(name).ok())?;
    apply_overrides(&mut settings, overrides)?;
    settings.database_url = normalize_database_url(&settings.database_url);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.endpoint {
        settings.endpoint = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.storage_key {
        settings.storage_key = v;
    }
    if let Some(v) = file_cfg.default_search_term {
        settings.default_search_term = v;
    }
    if let Some(v) = file_cfg.stale_responses {
        settings.stale_responses = v.parse()?;
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = Some(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = var("HN_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = var("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__DEFAULT_SEARCH_TERM") {
        settings.default_search_term = v;
    }

    if let Some(v) = var("APP__STALE_RESPONSES") {
        settings.stale_responses = v
            .parse()
            .context("invalid APP__STALE_RESPONSES")?;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = Some(parsed);
        }
    }

    Ok(())
}

fn apply_overrides(settings: &mut Settings, overrides: &Overrides) -> Result<()> {
    if let Some(v) = &overrides.endpoint {
        settings.endpoint = v.clone();
    }
    if let Some(v) = &overrides.database_url {
        settings.database_url = v.clone();
    }
    if let Some(v) = &overrides.stale_responses {
        settings.stale_responses = v.parse().context("invalid --stale-responses")?;
    }
    Ok(())
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
