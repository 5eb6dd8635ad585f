use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use crate::client::{ClientConfig, CONFIG_ELEMENT_ID};
use crate::controller::{BoardController, BoardView};
use crate::fetch::{cache_busted_url, LoadError};
use crate::records::Category;
use crate::render::render_board;

/// Page elements the client writes to or listens on.
struct Ui {
    status_el: Option<Element>,
    stats_el: Option<Element>,
    board_el: Option<Element>,
    search_input: Option<HtmlInputElement>,
    category_select: Option<HtmlSelectElement>,
    refresh_button: Option<Element>,
}

struct AppState {
    ui: Ui,
    csv_url: String,
    controller: BoardController,
    search_timer: Option<Timeout>,
    is_loading: bool,
}

impl AppState {
    fn new(document: &Document, config: ClientConfig) -> Self {
        let ui = Ui {
            status_el: document.get_element_by_id("status"),
            stats_el: document.get_element_by_id("stats"),
            board_el: document.get_element_by_id("leaderboard"),
            search_input: document
                .get_element_by_id("search")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok()),
            category_select: document
                .get_element_by_id("category")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok()),
            refresh_button: document.get_element_by_id("refresh"),
        };

        Self {
            ui,
            csv_url: config.csv_url,
            controller: BoardController::new(config.debounce_ms),
            search_timer: None,
            is_loading: false,
        }
    }
}

fn window() -> web_sys::Window {
    web_sys::window().expect("window")
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn read_client_config(document: &Document) -> ClientConfig {
    let embedded = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty())
        .and_then(|text| js_sys::JSON::parse(&text).ok())
        .and_then(|value| serde_wasm_bindgen::from_value::<ClientConfig>(value).ok());
    if let Some(config) = embedded {
        return config;
    }

    let mut config = ClientConfig::default();
    let meta = document
        .query_selector("meta[name=\"board-csv-url\"]")
        .ok()
        .flatten();
    if let Some(value) = meta.and_then(|meta| meta.get_attribute("content")) {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("{{") {
            config.csv_url = trimmed.to_string();
        }
    }
    config
}

fn set_status(ui: &Ui, text: &str, tone: &str) {
    if let Some(status_el) = &ui.status_el {
        status_el.set_text_content(Some(text));
        let _ = status_el.set_attribute("data-tone", tone);
    }
}

/// Replace the board, the stats and the status line. Safe to call on every
/// event: output depends only on the view.
fn paint(ui: &Ui, view: &BoardView<'_>) {
    let board = render_board(view);
    if let Some(board_el) = &ui.board_el {
        board_el.set_inner_html(&board.cards_html);
    }
    if let Some(stats_el) = &ui.stats_el {
        stats_el.set_inner_html(&board.stats_html);
    }
    set_status(ui, &board.summary, board.tone);
}

fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let http_error = |err: JsValue| LoadError::Http {
        url: url.to_string(),
        message: js_error_message(err, "Request failed"),
    };

    let response = JsFuture::from(window().fetch_with_str(url))
        .await
        .map_err(http_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(http_error)?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let text = JsFuture::from(response.text().map_err(http_error)?)
        .await
        .map_err(http_error)?;
    text.as_string().ok_or_else(|| LoadError::Http {
        url: url.to_string(),
        message: "response body was not text".to_string(),
    })
}

/// Fetch the CSV and rebuild the working set. A failed fetch shows the error
/// state; there is no retry until the visitor refreshes.
fn load_board(state_rc: Rc<RefCell<AppState>>) {
    let url = {
        let mut guard = state_rc.borrow_mut();
        let state = &mut *guard;
        if state.is_loading {
            return;
        }
        state.is_loading = true;
        state.controller.begin_loading();
        paint(&state.ui, &state.controller.view());
        cache_busted_url(&state.csv_url, now_ms())
    };

    let state_clone = state_rc.clone();
    spawn_local(async move {
        let result = fetch_text(&url).await;
        let mut guard = state_clone.borrow_mut();
        let state = &mut *guard;
        match result {
            Ok(text) => state.controller.load_csv(&text),
            Err(err) => state.controller.fail(err),
        }
        state.is_loading = false;
        paint(&state.ui, &state.controller.view());
    });
}

/// Debounced search: each keystroke replaces the pending timer, and the
/// controller ignores any ticket that is no longer the latest.
fn schedule_search(state_rc: Rc<RefCell<AppState>>, text: String) {
    let (ticket, delay) = {
        let mut state = state_rc.borrow_mut();
        state.search_timer = None;
        let now = now_ms();
        let ticket = state.controller.input_search(&text, now);
        (ticket, ticket.due_ms.saturating_sub(now) as u32)
    };

    let state_clone = state_rc.clone();
    let timer = Timeout::new(delay, move || {
        let mut guard = state_clone.borrow_mut();
        let state = &mut *guard;
        let now = now_ms().max(ticket.due_ms);
        if let Some(view) = state.controller.fire(ticket, now) {
            paint(&state.ui, &view);
        }
    });
    state_rc.borrow_mut().search_timer = Some(timer);
}

fn clear_search(state_rc: &Rc<RefCell<AppState>>) {
    let mut guard = state_rc.borrow_mut();
    let state = &mut *guard;
    state.search_timer = None;
    if let Some(input) = &state.ui.search_input {
        input.set_value("");
    }
    let view = state.controller.clear_search();
    paint(&state.ui, &view);
}

fn change_category(state_rc: &Rc<RefCell<AppState>>, value: &str) {
    let mut guard = state_rc.borrow_mut();
    let state = &mut *guard;
    let view = state.controller.set_category(Category::parse_or_all(value));
    paint(&state.ui, &view);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = window().document().expect("document");
    let config = read_client_config(&document);
    let state_rc = Rc::new(RefCell::new(AppState::new(&document, config)));

    {
        let mut state = state_rc.borrow_mut();
        let initial_search = state.ui.search_input.as_ref().map(|input| input.value());
        if let Some(text) = initial_search {
            state.controller.apply_search(&text);
        }
        let initial_category = state.ui.category_select.as_ref().map(|select| select.value());
        if let Some(value) = initial_category {
            state.controller.set_category(Category::parse_or_all(&value));
        }
    }

    load_board(state_rc.clone());

    {
        let state = state_rc.borrow();
        if let Some(input) = &state.ui.search_input {
            let state_clone = state_rc.clone();
            let handler = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let target = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok());
                if let Some(target) = target {
                    schedule_search(state_clone.clone(), target.value());
                }
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = input.add_event_listener_with_callback("input", handler.as_ref().unchecked_ref());
            handler.forget();

            let state_clone = state_rc.clone();
            let handler = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let key_event = match event.dyn_into::<web_sys::KeyboardEvent>() {
                    Ok(event) => event,
                    Err(_) => return,
                };
                if key_event.key() != "Escape" {
                    return;
                }
                clear_search(&state_clone);
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = input.add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref());
            handler.forget();
        }

        if let Some(select) = &state.ui.category_select {
            let state_clone = state_rc.clone();
            let handler = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let target = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok());
                if let Some(target) = target {
                    change_category(&state_clone, &target.value());
                }
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = select.add_event_listener_with_callback("change", handler.as_ref().unchecked_ref());
            handler.forget();
        }

        if let Some(button) = &state.ui.refresh_button {
            let state_clone = state_rc.clone();
            let handler = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                load_board(state_clone.clone());
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
            handler.forget();
        }
    }

    Ok(())
}
