use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// One validated row of the progress CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub user_name: String,
    pub completion_time: String,
    pub skill_badges: u32,
    pub arcade_games: u32,
    pub profile_url: String,
    pub badge_names: Vec<String>,
    pub game_names: Vec<String>,
    /// Position among the valid data rows of the source file.
    pub row_index: usize,
}

impl ParticipantRecord {
    pub fn score(&self) -> u32 {
        self.skill_badges.saturating_add(self.arcade_games)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl AchievementLevel {
    pub const ALL: [AchievementLevel; 4] = [
        AchievementLevel::Beginner,
        AchievementLevel::Intermediate,
        AchievementLevel::Advanced,
        AchievementLevel::Expert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AchievementLevel::Beginner => "Beginner",
            AchievementLevel::Intermediate => "Intermediate",
            AchievementLevel::Advanced => "Advanced",
            AchievementLevel::Expert => "Expert",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            AchievementLevel::Beginner => "level-beginner",
            AchievementLevel::Intermediate => "level-intermediate",
            AchievementLevel::Advanced => "level-advanced",
            AchievementLevel::Expert => "level-expert",
        }
    }
}

impl fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    #[serde(flatten)]
    pub record: ParticipantRecord,
    pub rank: u32,
    pub achievement: AchievementLevel,
}

impl LeaderboardRow {
    pub fn score(&self) -> u32 {
        self.record.score()
    }

    pub fn is_podium(&self) -> bool {
        (1..=3).contains(&self.rank)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[default]
    All,
    Badges,
    Games,
    Active,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Badges => "badges",
            Category::Games => "games",
            Category::Active => "active",
        }
    }

    pub fn matches(self, row: &LeaderboardRow) -> bool {
        match self {
            Category::All => true,
            Category::Badges => row.record.skill_badges > 0,
            Category::Games => row.record.arcade_games > 0,
            Category::Active => row.score() > 0,
        }
    }

    /// Lenient parse used for query strings and the select control.
    pub fn parse_or_all(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Category::All),
            "badges" => Ok(Category::Badges),
            "games" => Ok(Category::Games),
            "active" => Ok(Category::Active),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}
