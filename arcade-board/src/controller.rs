//! Owned board state: the working set, the active category and the debounced
//! search text.
//!
//! Time is passed in as epoch milliseconds so the same controller drives the
//! browser client (timer callbacks) and the tests (a fake clock).

use crate::csv_data::parse_participants;
use crate::fetch::LoadError;
use crate::ranking::{rank_participants, BoardStats};
use crate::records::{Category, LeaderboardRow};
use crate::sanitize::escape_text;

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(LoadError),
}

/// Handle for a scheduled search. Only the most recent ticket can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    id: u64,
    pub due_ms: u64,
}

#[derive(Clone, Debug)]
struct PendingSearch {
    ticket: u64,
    text: String,
    due_ms: u64,
}

/// The visible part of the board plus what the renderer needs around it.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardView<'a> {
    pub rows: Vec<&'a LeaderboardRow>,
    pub total: usize,
    pub stats: &'a BoardStats,
    pub category: Category,
    pub search: &'a str,
    pub state: &'a LoadState,
}

impl BoardView<'_> {
    pub fn is_filtered(&self) -> bool {
        self.category != Category::All || !self.search.is_empty()
    }
}

pub struct BoardController {
    rows: Vec<LeaderboardRow>,
    search_keys: Vec<String>,
    stats: BoardStats,
    state: LoadState,
    category: Category,
    search: String,
    pending: Option<PendingSearch>,
    next_ticket: u64,
    debounce_ms: u64,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE_MS)
    }
}

impl BoardController {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            rows: Vec::new(),
            search_keys: Vec::new(),
            stats: BoardStats::default(),
            state: LoadState::Loading,
            category: Category::All,
            search: String::new(),
            pending: None,
            next_ticket: 0,
            debounce_ms,
        }
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending.is_some()
    }

    /// Mark a fetch in flight. Rows from the previous load stay visible and the
    /// renderer flags them as refreshing.
    pub fn begin_loading(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Replace the working set wholesale.
    pub fn load(&mut self, rows: Vec<LeaderboardRow>) {
        self.search_keys = rows
            .iter()
            .map(|row| search_key(&row.record.user_name))
            .collect();
        self.stats = BoardStats::from_rows(&rows);
        self.rows = rows;
        self.state = LoadState::Ready;
    }

    pub fn load_csv(&mut self, text: &str) {
        self.load(rank_participants(parse_participants(text)));
    }

    /// Record a failed fetch. The old working set is dropped so nothing stale
    /// is shown as current.
    pub fn fail(&mut self, err: LoadError) {
        self.rows.clear();
        self.search_keys.clear();
        self.stats = BoardStats::default();
        self.state = LoadState::Failed(err);
    }

    /// Category changes apply at once.
    pub fn set_category(&mut self, category: Category) -> BoardView<'_> {
        self.category = category;
        self.view()
    }

    /// Schedule `text` to become the search after the quiet period. Any search
    /// still waiting is superseded.
    pub fn input_search(&mut self, text: &str, now_ms: u64) -> SearchTicket {
        self.next_ticket += 1;
        let due_ms = now_ms.saturating_add(self.debounce_ms);
        self.pending = Some(PendingSearch {
            ticket: self.next_ticket,
            text: text.trim().to_string(),
            due_ms,
        });
        SearchTicket {
            id: self.next_ticket,
            due_ms,
        }
    }

    /// Timer callback for `ticket`. Returns a view to render only when this
    /// ticket is still the latest and its quiet period has elapsed.
    pub fn fire(&mut self, ticket: SearchTicket, now_ms: u64) -> Option<BoardView<'_>> {
        let current = matches!(
            &self.pending,
            Some(pending) if pending.ticket == ticket.id && now_ms >= pending.due_ms
        );
        if !current {
            return None;
        }
        self.apply_pending();
        Some(self.view())
    }

    /// Apply whatever search is pending if it is due.
    pub fn poll(&mut self, now_ms: u64) -> Option<BoardView<'_>> {
        let due = matches!(&self.pending, Some(pending) if now_ms >= pending.due_ms);
        if !due {
            return None;
        }
        self.apply_pending();
        Some(self.view())
    }

    /// Set the search immediately, dropping anything pending.
    pub fn apply_search(&mut self, text: &str) -> BoardView<'_> {
        self.pending = None;
        self.search = text.trim().to_string();
        self.view()
    }

    pub fn clear_search(&mut self) -> BoardView<'_> {
        self.apply_search("")
    }

    fn apply_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.search = pending.text;
        }
    }

    pub fn view(&self) -> BoardView<'_> {
        let needle = search_key(&self.search);
        let rows = self
            .rows
            .iter()
            .zip(&self.search_keys)
            .filter(|(row, key)| self.category.matches(row) && key.contains(&needle))
            .map(|(row, _)| row)
            .collect();
        BoardView {
            rows,
            total: self.rows.len(),
            stats: &self.stats,
            category: self.category,
            search: &self.search,
            state: &self.state,
        }
    }
}

/// Names are matched as element text serializes them, so quotes never turn
/// into entity text a query could hit.
fn search_key(value: &str) -> String {
    escape_text(value.trim()).to_lowercase()
}
