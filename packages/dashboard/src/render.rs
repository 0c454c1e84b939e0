use std::time::Instant;

use common::leaderboard::{LeaderboardKind, LeaderboardRow};
use console::{Style, pad_str, Alignment};

use crate::client::AdminAction;
use crate::heatmap::{Heatmap, LEGEND};
use crate::page::{LeaderboardPage, LoadState, ToastKind};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const LEVEL_GLYPHS: [&str; 5] = ["·", "░", "▒", "▓", "█"];

fn rank_style(index: usize) -> Style {
    match index {
        0 => Style::new().yellow().bold(),
        1 => Style::new().white().bold(),
        2 => Style::new().color256(130).bold(),
        _ => Style::new().blue(),
    }
}

fn level_style(level: u8) -> Style {
    match level {
        0 => Style::new().black().bright(),
        1 => Style::new().color256(22),
        2 => Style::new().color256(28),
        3 => Style::new().color256(34),
        _ => Style::new().color256(40),
    }
}

fn platform_style(row: &LeaderboardRow) -> Style {
    match row.platform {
        common::Platform::LeetCode => Style::new().yellow(),
        common::Platform::Codeforces => Style::new().blue(),
        common::Platform::CodeChef => Style::new().color256(94),
    }
}

/// Render the leaderboard table.
pub fn render_table(kind: LeaderboardKind, rows: &[LeaderboardRow]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("No users found for this leaderboard.\n");
        return out;
    }

    let header = format!(
        "{}  {}  {}  {}",
        pad_str("Rank", 4, Alignment::Right, None),
        pad_str("User", 24, Alignment::Left, None),
        pad_str("Platform", 10, Alignment::Left, None),
        pad_str(kind.metric_label(), 16, Alignment::Right, None),
    );
    out.push_str(&format!("{}\n", Style::new().bold().apply_to(header)));

    for (i, row) in rows.iter().enumerate() {
        let rank = format!("#{}", i + 1);
        let user = match &row.name {
            Some(name) if !name.is_empty() => format!("{} ({})", row.username, name),
            _ => row.username.clone(),
        };
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            rank_style(i).apply_to(pad_str(&rank, 4, Alignment::Right, None)),
            pad_str(&user, 24, Alignment::Left, Some("…")),
            platform_style(row).apply_to(pad_str(row.platform.label(), 10, Alignment::Left, None)),
            pad_str(&row.metric_display(kind), 16, Alignment::Right, None),
        ));
    }
    out
}

/// Render a GitHub-style calendar: seven weekday rows, one column per week.
pub fn render_heatmap(map: &Heatmap) -> String {
    let mut out = format!(
        "{} {}  ({} submissions)\n",
        Style::new().bold().apply_to("Activity Heatmap"),
        map.year,
        map.total()
    );

    for (weekday, row) in WEEKDAYS.iter().zip(map.grid()) {
        out.push_str(weekday);
        out.push(' ');
        for slot in row {
            match slot {
                Some(level) => {
                    let glyph = LEVEL_GLYPHS[usize::from(level).min(LEVEL_GLYPHS.len() - 1)];
                    out.push_str(&level_style(level).apply_to(glyph).to_string());
                }
                None => out.push(' '),
            }
        }
        out.push('\n');
    }

    out.push_str("Less ");
    for (level, label) in LEGEND {
        out.push_str(&format!(
            "{} {} ",
            level_style(level).apply_to(LEVEL_GLYPHS[usize::from(level)]),
            label
        ));
    }
    out.push_str("More\n");
    out
}

fn render_admin_controls(page: &LeaderboardPage) -> String {
    let style = if page.action_loading() {
        Style::new().dim()
    } else {
        Style::new().green()
    };
    let buttons: Vec<String> = AdminAction::ALL
        .iter()
        .map(|a| style.apply_to(format!("[{}]", a.label())).to_string())
        .collect();

    let mut line = buttons.join(" ");
    if page.action_loading() {
        line.push_str(" (working...)");
    }
    line.push('\n');
    line
}

/// Render the whole page as of `now`.
pub fn render_page(page: &LeaderboardPage, now: Instant) -> String {
    let mut out = format!(
        "{}\n",
        Style::new()
            .bold()
            .cyan()
            .apply_to("Competitive Programming Leaderboard")
    );

    if page.show_admin_controls() {
        out.push_str(&render_admin_controls(page));
    }

    if let Some(toast) = page.toast(now) {
        let style = match toast.kind {
            ToastKind::Success => Style::new().green(),
            ToastKind::Error => Style::new().red(),
        };
        out.push_str(&format!("{}\n", style.apply_to(&toast.message)));
    }

    out.push('\n');
    out.push_str(&render_heatmap(page.heatmap()));
    out.push('\n');

    let platform = page.platform().map(|p| p.label()).unwrap_or("All Platforms");
    out.push_str(&format!(
        "{} | {}\n",
        Style::new().bold().apply_to(page.kind().metric_label()),
        platform
    ));

    match page.state() {
        LoadState::Idle => out.push_str("Select a leaderboard to load.\n"),
        LoadState::Loading => out.push_str("Loading...\n"),
        LoadState::Error(message) => {
            out.push_str(&format!("{}\n", Style::new().red().apply_to(message)));
        }
        LoadState::Success(rows) => out.push_str(&render_table(page.kind(), rows)),
    }
    out
}
