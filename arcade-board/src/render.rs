//! Board markup. Every user-supplied string goes through `escape_html` before
//! it is placed in the output; the output is a pure function of the view.

use crate::controller::{BoardView, LoadState};
use crate::ranking::BoardStats;
use crate::records::{AchievementLevel, LeaderboardRow};
use crate::sanitize::{escape_html, safe_profile_href};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBoard {
    pub cards_html: String,
    pub stats_html: String,
    pub summary: String,
    pub tone: &'static str,
}

pub fn render_board(view: &BoardView<'_>) -> RenderedBoard {
    match view.state {
        LoadState::Failed(err) => RenderedBoard {
            cards_html: format!(
                "<p class=\"empty error\" role=\"alert\">Unable to load the leaderboard: {}</p>",
                escape_html(&err.to_string())
            ),
            stats_html: String::new(),
            summary: "Error: leaderboard data unavailable".to_string(),
            tone: "error",
        },
        LoadState::Loading if view.total == 0 => RenderedBoard {
            cards_html: "<p class=\"empty\">Loading leaderboard...</p>".to_string(),
            stats_html: String::new(),
            summary: "Fetching progress data...".to_string(),
            tone: "info",
        },
        state => {
            let refreshing = matches!(state, LoadState::Loading);
            RenderedBoard {
                cards_html: render_cards(view),
                stats_html: render_stats(view.stats),
                summary: summary_line(view, refreshing),
                tone: if refreshing { "info" } else { "ok" },
            }
        }
    }
}

fn render_cards(view: &BoardView<'_>) -> String {
    if view.rows.is_empty() {
        return empty_state(view);
    }
    let mut out = String::new();
    for row in &view.rows {
        out.push_str(&render_card(row));
    }
    out
}

fn empty_state(view: &BoardView<'_>) -> String {
    if view.total == 0 {
        return "<p class=\"empty\">No participants yet.</p>".to_string();
    }
    if view.search.is_empty() {
        return format!(
            "<p class=\"empty\">No participants in the \"{}\" category.</p>",
            view.category.as_str()
        );
    }
    format!(
        "<p class=\"empty\">No participants match \"{}\".</p>",
        escape_html(view.search)
    )
}

pub fn render_card(row: &LeaderboardRow) -> String {
    let record = &row.record;
    let (podium_class, medal) = match row.rank {
        1 => (" card-gold", "<span class=\"medal\" aria-label=\"first place\">&#129351;</span>"),
        2 => (" card-silver", "<span class=\"medal\" aria-label=\"second place\">&#129352;</span>"),
        3 => (" card-bronze", "<span class=\"medal\" aria-label=\"third place\">&#129353;</span>"),
        _ => ("", ""),
    };

    let name = escape_html(&record.user_name);
    let name_html = match safe_profile_href(&record.profile_url) {
        Some(href) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            href, name
        ),
        None => name,
    };

    let mut out = format!(
        "<article class=\"card{}{}\" data-rank=\"{}\">\
         <div class=\"card-rank\">{}#{}</div>\
         <h3 class=\"card-name\">{}</h3>\
         <span class=\"level {}\">{}</span>\
         <dl class=\"card-metrics\">\
         <div><dt>Skill badges</dt><dd>{}</dd></div>\
         <div><dt>Arcade games</dt><dd>{}</dd></div>\
         <div><dt>Total</dt><dd>{}</dd></div>\
         </dl>",
        if row.is_podium() { " podium" } else { "" },
        podium_class,
        row.rank,
        medal,
        row.rank,
        name_html,
        row.achievement.css_class(),
        row.achievement.label(),
        record.skill_badges,
        record.arcade_games,
        row.score(),
    );

    if !record.completion_time.is_empty() {
        out.push_str(&format!(
            "<p class=\"card-time\">Completed: {}</p>",
            escape_html(&record.completion_time)
        ));
    }
    out.push_str(&name_list("Skill badges", &record.badge_names));
    out.push_str(&name_list("Arcade games", &record.game_names));
    out.push_str("</article>");
    out
}

fn name_list(title: &str, names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let items: String = names
        .iter()
        .map(|name| format!("<li>{}</li>", escape_html(name)))
        .collect();
    format!(
        "<details class=\"card-list\"><summary>{} ({})</summary><ul>{}</ul></details>",
        title,
        names.len(),
        items
    )
}

pub fn render_stats(stats: &BoardStats) -> String {
    let mut out = String::from("<dl class=\"stats\">");
    let entries = [
        ("Participants", stats.participants.to_string()),
        ("Active", stats.active.to_string()),
        ("Skill badges", stats.total_skill_badges.to_string()),
        ("Arcade games", stats.total_arcade_games.to_string()),
        ("Top score", stats.top_score.to_string()),
    ];
    for (label, value) in entries {
        out.push_str(&format!(
            "<div class=\"stat\"><dt>{}</dt><dd>{}</dd></div>",
            label, value
        ));
    }
    for level in AchievementLevel::ALL {
        out.push_str(&format!(
            "<div class=\"stat {}\"><dt>{}</dt><dd>{}</dd></div>",
            level.css_class(),
            level.label(),
            stats.level_count(level)
        ));
    }
    out.push_str("</dl>");
    out
}

fn summary_line(view: &BoardView<'_>, refreshing: bool) -> String {
    let label = if view.total == 1 {
        "participant"
    } else {
        "participants"
    };
    let filter_note = if view.is_filtered() { " (filtered)" } else { "" };
    let refresh_note = if refreshing { " - refreshing..." } else { "" };
    format!(
        "Showing {} of {} {}{}{}",
        view.rows.len(),
        view.total,
        label,
        filter_note,
        refresh_note
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::BoardController;
    use crate::fetch::LoadError;
    use crate::records::Category;

    fn controller(csv: &str) -> BoardController {
        let mut controller = BoardController::new(300);
        controller.load_csv(csv);
        controller
    }

    #[test]
    fn top_three_are_highlighted() {
        let controller = controller("User Name,Badges\nA,9\nB,8\nC,7\nD,6\n");
        let board = render_board(&controller.view());
        assert!(board.cards_html.contains("card podium card-gold"));
        assert!(board.cards_html.contains("card podium card-silver"));
        assert!(board.cards_html.contains("card podium card-bronze"));
        assert!(board.cards_html.contains("<article class=\"card\" data-rank=\"4\">"));
        assert_eq!(board.summary, "Showing 4 of 4 participants");
        assert_eq!(board.tone, "ok");
    }

    #[test]
    fn markup_in_fields_is_never_live() {
        let csv = "User Name,Badges,Completion Time,Profile URL,Names of Skill Badges\n\
                   <script>alert(1)</script>,3,<img src=x onerror=alert(2)>,javascript:alert(3),\"<b>bold</b>\"\n";
        let controller = controller(csv);
        let board = render_board(&controller.view());
        assert!(!board.cards_html.contains("<script>"));
        assert!(!board.cards_html.contains("<img"));
        assert!(!board.cards_html.contains("<b>"));
        assert!(!board.cards_html.contains("javascript:"));
        assert!(board.cards_html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(board.cards_html.contains("&lt;img src=x onerror=alert(2)&gt;"));
    }

    #[test]
    fn profile_links_open_in_new_tab() {
        let controller = controller("User Name,Badges,Profile URL\nAna,1,https://example.com/u/1\n");
        let board = render_board(&controller.view());
        assert!(board.cards_html.contains(
            "<a href=\"https://example.com/u/1\" target=\"_blank\" rel=\"noopener noreferrer\">Ana</a>"
        ));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut controller = controller("User Name,Badges,Games\nA,9,1\nB,8,0\n");
        controller.set_category(Category::Games);
        let first = render_board(&controller.view());
        let second = render_board(&controller.view());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_search_result_shows_message() {
        let mut controller = controller("User Name,Badges\nAlice,5\n");
        let board = render_board(&controller.apply_search("<zed>"));
        assert_eq!(
            board.cards_html,
            "<p class=\"empty\">No participants match \"&lt;zed&gt;\".</p>"
        );
        assert!(board.stats_html.contains("<dt>Participants</dt><dd>1</dd>"));
        assert_eq!(board.summary, "Showing 0 of 1 participant (filtered)");
    }

    #[test]
    fn stats_describe_full_working_set_while_filtered() {
        let mut controller = controller("User Name,Badges,Games\nA,9,1\nB,0,0\n");
        let board = render_board(&controller.set_category(Category::Active));
        assert!(board.stats_html.contains("<dt>Participants</dt><dd>2</dd>"));
        assert!(board.stats_html.contains("<dt>Active</dt><dd>1</dd>"));
        assert!(board.stats_html.contains("<dt>Intermediate</dt><dd>1</dd>"));
    }

    #[test]
    fn fetch_failure_renders_error_state() {
        let mut controller = controller("User Name,Badges\nAlice,5\n");
        controller.fail(LoadError::Status {
            url: "/data/progress_data.csv?t=1".to_string(),
            status: 503,
        });
        let board = render_board(&controller.view());
        assert_eq!(board.tone, "error");
        assert!(board.cards_html.contains("role=\"alert\""));
        assert!(board.cards_html.contains("HTTP 503"));
        assert!(!board.cards_html.contains("Alice"));
        assert!(board.stats_html.is_empty());
    }

    #[test]
    fn first_load_shows_loading_placeholder() {
        let controller = BoardController::new(300);
        let board = render_board(&controller.view());
        assert_eq!(board.cards_html, "<p class=\"empty\">Loading leaderboard...</p>");
        assert_eq!(board.tone, "info");
    }

    #[test]
    fn refresh_keeps_rows_but_says_so() {
        let mut controller = controller("User Name,Badges\nAlice,5\n");
        controller.begin_loading();
        let board = render_board(&controller.view());
        assert!(board.cards_html.contains("Alice"));
        assert_eq!(board.summary, "Showing 1 of 1 participant - refreshing...");
    }
}
