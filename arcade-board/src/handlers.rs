use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use arcade_board::controller::BoardController;
use arcade_board::records::Category;
use arcade_board::render::render_board;
use arcade_board::render_index;

use crate::models::{BoardParams, ErrorPayload, LeaderboardPayload};
use crate::state::AppState;
use crate::util::now_ms;

pub(crate) async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// The page, with a server-rendered copy of the board for visitors without
/// scripting. The browser client replaces it after its own fetch.
pub(crate) async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut controller = BoardController::new(state.client_config.debounce_ms);
    match state.source.load_board().await {
        Ok(rows) => controller.load(rows),
        Err(err) => controller.fail(err),
    }
    let board = render_board(&controller.view());
    let fallback = format!(
        "<p class=\"summary\">{}</p>{}{}",
        board.summary, board.stats_html, board.cards_html
    );
    let html = render_index(&state.client_config, &state.cache_bust, &fallback);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    (StatusCode::OK, headers, html).into_response()
}

/// The raw progress CSV. Never cached, so the cache-busting query is only a
/// second line of defence for intermediaries that ignore headers.
pub(crate) async fn csv_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.source.fetch_text().await {
        Ok(text) => {
            let mut headers = cors_headers();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            (StatusCode::OK, headers, text).into_response()
        }
        Err(err) => {
            warn!(%err, "progress csv unavailable");
            (StatusCode::BAD_GATEWAY, cors_headers(), err.to_string()).into_response()
        }
    }
}

pub(crate) async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoardParams>,
) -> Response {
    let category = params
        .category
        .as_deref()
        .map(Category::parse_or_all)
        .unwrap_or_default();
    let search = params.q.unwrap_or_default();

    let rows = match state.source.load_board().await {
        Ok(rows) => rows,
        Err(err) => return error_response(StatusCode::BAD_GATEWAY, err.to_string()),
    };

    let mut controller = BoardController::new(0);
    controller.load(rows);
    controller.set_category(category);
    let view = controller.apply_search(&search);

    json_response(&LeaderboardPayload {
        category: view.category,
        search: view.search,
        total: view.total,
        visible: view.rows.len(),
        stats: view.stats,
        rows: view.rows.clone(),
        ts: now_ms(),
    })
}

pub(crate) async fn options_handler() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cors_headers())
}

fn json_response<T: Serialize>(payload: &T) -> Response {
    let body = match serde_json::to_string(payload) {
        Ok(body) => body,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    let mut headers = cors_headers();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    (StatusCode::OK, headers, body).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = serde_json::to_string(&ErrorPayload { error: message })
        .unwrap_or_else(|_| "{\"error\":\"internal error\"}".to_string());
    let mut headers = cors_headers();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    (status, headers, body).into_response()
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
    headers
}
