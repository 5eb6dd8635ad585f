use std::sync::Arc;

use arcade_board::client::ClientConfig;

use crate::config::Config;
use crate::loader::CsvSource;
use crate::util::now_ms;

pub(crate) struct AppState {
    pub(crate) config: Config,
    pub(crate) source: CsvSource,
    pub(crate) client_config: ClientConfig,
    pub(crate) cache_bust: String,
}

impl AppState {
    pub(crate) fn new(config: Config, source: CsvSource) -> Arc<Self> {
        let client_config = ClientConfig {
            csv_url: config.csv_route.clone(),
            debounce_ms: config.search_debounce.as_millis() as u64,
        };
        Arc::new(Self {
            config,
            source,
            client_config,
            cache_bust: now_ms().to_string(),
        })
    }
}
