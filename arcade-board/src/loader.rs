use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arcade_board::csv_data::parse_participants;
use arcade_board::fetch::{cache_busted_url, LoadError};
use arcade_board::ranking::rank_participants;
use arcade_board::records::LeaderboardRow;
use tracing::{debug, warn};

use crate::config::Config;
use crate::util::now_ms;

/// Where the progress CSV comes from. Every call reads the current file; there
/// is no caching and no retry.
#[derive(Clone)]
pub(crate) enum CsvSource {
    File(PathBuf),
    Remote { client: reqwest::Client, url: String },
}

impl CsvSource {
    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        match &config.csv_source_url {
            Some(url) => Ok(Self::remote(url.clone(), config.request_timeout)?),
            None => Ok(Self::File(config.csv_path.clone())),
        }
    }

    pub(crate) fn remote(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build CSV client")?;
        Ok(Self::Remote { client, url })
    }

    pub(crate) async fn fetch_text(&self) -> Result<String, LoadError> {
        match self {
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|err| LoadError::Io {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
                // Bad bytes in one row must not sink the file; decode the way
                // `Response::text` does.
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Self::Remote { client, url } => {
                let url = cache_busted_url(url, now_ms());
                let response = client.get(&url).send().await.map_err(|err| LoadError::Http {
                    url: url.clone(),
                    message: err.to_string(),
                })?;
                if !response.status().is_success() {
                    return Err(LoadError::Status {
                        url,
                        status: response.status().as_u16(),
                    });
                }
                response.text().await.map_err(|err| LoadError::Http {
                    url,
                    message: err.to_string(),
                })
            }
        }
    }

    /// Fetch, parse and rank in one pass.
    pub(crate) async fn load_board(&self) -> Result<Vec<LeaderboardRow>, LoadError> {
        let text = match self.fetch_text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "failed to load progress csv");
                return Err(err);
            }
        };
        let rows = rank_participants(parse_participants(&text));
        debug!(rows = rows.len(), bytes = text.len(), "progress csv loaded");
        Ok(rows)
    }
}
