use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use arcade_board::client::DEFAULT_CSV_URL;
use arcade_board::controller::DEFAULT_SEARCH_DEBOUNCE_MS;
use tracing::warn;

use crate::constants::{
    DEFAULT_CSV_PATH, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_STATIC_DIR,
    MAX_SEARCH_DEBOUNCE_MS,
};

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) port: u16,
    pub(crate) static_dir: String,
    /// Local copy of the progress CSV, rewritten by the scrape job.
    pub(crate) csv_path: PathBuf,
    /// Public path the page fetches the CSV from.
    pub(crate) csv_route: String,
    /// When set, the CSV is pulled from here instead of `csv_path`.
    pub(crate) csv_source_url: Option<String>,
    pub(crate) search_debounce: Duration,
    pub(crate) request_timeout: Duration,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

        let csv_path = PathBuf::from(
            read_env_first(&["CSV_PATH", "PROGRESS_CSV_PATH"])
                .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
        );

        let csv_route = normalize_route(
            &read_env_first(&["CSV_URL"]).unwrap_or_else(|| DEFAULT_CSV_URL.to_string()),
        )?;

        let csv_source_url = read_env_first(&["CSV_SOURCE_URL"]);
        if let Some(url) = csv_source_url.as_deref() {
            if url::Url::parse(url).is_err() {
                bail!("CSV_SOURCE_URL is not an absolute URL: {}", url);
            }
        }

        let debounce_ms = env::var("SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS);
        if debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
            warn!(
                debounce_ms,
                "SEARCH_DEBOUNCE_MS too large; clamping to {}", MAX_SEARCH_DEBOUNCE_MS
            );
        }
        let search_debounce = Duration::from_millis(debounce_ms.min(MAX_SEARCH_DEBOUNCE_MS));

        let request_timeout = Duration::from_millis(
            env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        );

        Ok(Self {
            port,
            static_dir,
            csv_path,
            csv_route,
            csv_source_url,
            search_debounce,
            request_timeout,
        })
    }
}

pub(crate) fn read_env_first(keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim().to_string();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
    None
}

/// The CSV route must be a plain site path so it can be mounted on the router.
pub(crate) fn normalize_route(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.contains("://") || trimmed.contains('?') || trimmed.contains('#') {
        bail!("CSV_URL must be a site path, got {}", trimmed);
    }
    let route = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    if route.len() < 2 {
        bail!("CSV_URL must not be the site root");
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_rooted() {
        assert_eq!(normalize_route("data/p.csv").unwrap(), "/data/p.csv");
        assert_eq!(normalize_route(" /p.csv ").unwrap(), "/p.csv");
        assert!(normalize_route("/").is_err());
        assert!(normalize_route("https://example.com/p.csv").is_err());
        assert!(normalize_route("/p.csv?t=1").is_err());
    }
}
