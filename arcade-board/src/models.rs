use arcade_board::ranking::BoardStats;
use arcade_board::records::{Category, LeaderboardRow};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub(crate) struct BoardParams {
    pub(crate) category: Option<String>,
    pub(crate) q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeaderboardPayload<'a> {
    pub(crate) category: Category,
    pub(crate) search: &'a str,
    pub(crate) total: usize,
    pub(crate) visible: usize,
    pub(crate) stats: &'a BoardStats,
    pub(crate) rows: Vec<&'a LeaderboardRow>,
    pub(crate) ts: u64,
}

#[derive(Serialize)]
pub(crate) struct ErrorPayload {
    pub(crate) error: String,
}
