use std::cmp::Ordering;

use serde::Serialize;

use crate::records::{AchievementLevel, LeaderboardRow, ParticipantRecord};

pub const INTERMEDIATE_MIN_SCORE: u32 = 5;
pub const ADVANCED_MIN_SCORE: u32 = 15;
pub const EXPERT_MIN_SCORE: u32 = 30;

impl AchievementLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= EXPERT_MIN_SCORE {
            AchievementLevel::Expert
        } else if score >= ADVANCED_MIN_SCORE {
            AchievementLevel::Advanced
        } else if score >= INTERMEDIATE_MIN_SCORE {
            AchievementLevel::Intermediate
        } else {
            AchievementLevel::Beginner
        }
    }
}

/// Board order: total progress, then skill badges, then source row order.
pub fn compare_records(a: &ParticipantRecord, b: &ParticipantRecord) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| b.skill_badges.cmp(&a.skill_badges))
        .then_with(|| a.row_index.cmp(&b.row_index))
}

/// Sort records into board order and assign ranks 1..N.
pub fn rank_participants(mut records: Vec<ParticipantRecord>) -> Vec<LeaderboardRow> {
    records.sort_by(compare_records);
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let achievement = AchievementLevel::from_score(record.score());
            LeaderboardRow {
                record,
                rank: index as u32 + 1,
                achievement,
            }
        })
        .collect()
}

/// Aggregates over the whole working set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub participants: usize,
    pub active: usize,
    pub total_skill_badges: u64,
    pub total_arcade_games: u64,
    pub top_score: u32,
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
    pub expert: usize,
}

impl BoardStats {
    pub fn from_rows(rows: &[LeaderboardRow]) -> Self {
        let mut stats = BoardStats {
            participants: rows.len(),
            ..BoardStats::default()
        };
        for row in rows {
            let score = row.score();
            if score > 0 {
                stats.active += 1;
            }
            stats.total_skill_badges += u64::from(row.record.skill_badges);
            stats.total_arcade_games += u64::from(row.record.arcade_games);
            stats.top_score = stats.top_score.max(score);
            match row.achievement {
                AchievementLevel::Beginner => stats.beginner += 1,
                AchievementLevel::Intermediate => stats.intermediate += 1,
                AchievementLevel::Advanced => stats.advanced += 1,
                AchievementLevel::Expert => stats.expert += 1,
            }
        }
        stats
    }

    pub fn level_count(&self, level: AchievementLevel) -> usize {
        match level {
            AchievementLevel::Beginner => self.beginner,
            AchievementLevel::Intermediate => self.intermediate,
            AchievementLevel::Advanced => self.advanced,
            AchievementLevel::Expert => self.expert,
        }
    }
}
