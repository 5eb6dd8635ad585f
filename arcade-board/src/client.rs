use serde::{Deserialize, Serialize};

use crate::controller::DEFAULT_SEARCH_DEBOUNCE_MS;

pub const CONFIG_ELEMENT_ID: &str = "board-config";
pub const DEFAULT_CSV_URL: &str = "/data/progress_data.csv";

/// Settings the host page hands to the browser client as embedded JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub csv_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}
