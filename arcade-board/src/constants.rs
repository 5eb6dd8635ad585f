pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_STATIC_DIR: &str = "./static";
pub(crate) const DEFAULT_CSV_PATH: &str = "./static/data/progress_data.csv";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub(crate) const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;
