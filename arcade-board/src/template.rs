use crate::client::{ClientConfig, CONFIG_ELEMENT_ID};
use crate::sanitize::{escape_html, escape_script_json};

const INDEX_TEMPLATE: &str = include_str!("index.html");
const CSV_URL_TOKEN: &str = "{{csv_url}}";
const CACHE_BUST_TOKEN: &str = "{{cache_bust}}";
const CONFIG_SCRIPT_TOKEN: &str = "{{config_script}}";
const FALLBACK_TOKEN: &str = "{{fallback_board}}";

/// Render the board page. `fallback_board` is server-rendered markup shown to
/// visitors without scripting.
pub fn render_index(config: &ClientConfig, cache_bust: &str, fallback_board: &str) -> String {
    let config_script = serde_json::to_string(config)
        .map(|json| {
            format!(
                r#"<script id="{}" type="application/json">{}</script>"#,
                CONFIG_ELEMENT_ID,
                escape_script_json(&json)
            )
        })
        .unwrap_or_default();

    INDEX_TEMPLATE
        .replace(CSV_URL_TOKEN, &escape_html(&config.csv_url))
        .replace(CACHE_BUST_TOKEN, &escape_html(cache_bust))
        .replace(CONFIG_SCRIPT_TOKEN, &config_script)
        .replace(FALLBACK_TOKEN, fallback_board)
}
