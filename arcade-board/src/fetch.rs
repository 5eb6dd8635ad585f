use thiserror::Error;
use url::Url;

pub const CACHE_BUST_PARAM: &str = "t";

/// Why the progress CSV could not be loaded. Parsing never fails; only
/// retrieval does.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Append `t=<stamp>` so every load bypasses intermediary caches. Works for
/// absolute URLs and for site-relative paths such as `/data/progress.csv`.
pub fn cache_busted_url(base: &str, stamp_ms: u64) -> String {
    let stamp = stamp_ms.to_string();
    if let Ok(mut url) = Url::parse(base) {
        if !url.cannot_be_a_base() {
            url.query_pairs_mut().append_pair(CACHE_BUST_PARAM, &stamp);
            return url.to_string();
        }
    }

    let (path, fragment) = match base.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (base, None),
    };
    let separator = if !path.contains('?') {
        "?"
    } else if path.ends_with('?') || path.ends_with('&') {
        ""
    } else {
        "&"
    };
    let mut out = format!("{}{}{}={}", path, separator, CACHE_BUST_PARAM, stamp);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_get_a_query() {
        assert_eq!(
            cache_busted_url("/data/progress_data.csv", 42),
            "/data/progress_data.csv?t=42"
        );
        assert_eq!(cache_busted_url("progress.csv?v=2", 7), "progress.csv?v=2&t=7");
        assert_eq!(cache_busted_url("a.csv#top", 1), "a.csv?t=1#top");
    }

    #[test]
    fn absolute_urls_keep_existing_params() {
        assert_eq!(
            cache_busted_url("https://example.com/board.csv?branch=main", 99),
            "https://example.com/board.csv?branch=main&t=99"
        );
    }

    #[test]
    fn stamps_change_the_url() {
        assert_ne!(cache_busted_url("/p.csv", 1), cache_busted_url("/p.csv", 2));
    }

    #[test]
    fn errors_render_readably() {
        let err = LoadError::Status {
            url: "/p.csv".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "/p.csv responded with HTTP 404");
    }
}
