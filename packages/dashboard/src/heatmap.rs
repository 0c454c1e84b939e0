use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use common::leaderboard::UserSubmissionHistory;

/// Highest intensity level.
pub const MAX_LEVEL: u8 = 4;

/// Minimum daily count for each intensity level, as shown in the legend.
pub const LEGEND: [(u8, &str); 5] = [(0, "0"), (1, "1"), (2, "3"), (3, "5"), (4, "7+")];

/// Intensity bucket for a day: one level per two submissions, capped.
pub fn intensity(count: i64) -> u8 {
    (count.max(0) / 2).min(MAX_LEVEL as i64) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: i64,
    pub level: u8,
}

/// One calendar year of activity, one cell per day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heatmap {
    pub year: i32,
    pub cells: Vec<HeatmapCell>,
}

fn days_of_year(year: i32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.year() == year)
        .collect()
}

impl Heatmap {
    /// A year with no activity.
    pub fn empty(year: i32) -> Self {
        Self::from_counts(year, &HashMap::new())
    }

    /// Merge every user's daily points into a single series. Counts on the same
    /// calendar date are summed; points outside `year` are ignored.
    pub fn from_histories(year: i32, histories: &[UserSubmissionHistory]) -> Self {
        let mut counts: HashMap<NaiveDate, i64> = HashMap::new();
        for point in histories.iter().flat_map(|h| &h.submissions) {
            *counts.entry(point.date.date_naive()).or_default() += i64::from(point.count);
        }
        Self::from_counts(year, &counts)
    }

    fn from_counts(year: i32, counts: &HashMap<NaiveDate, i64>) -> Self {
        let cells = days_of_year(year)
            .into_iter()
            .map(|date| {
                let count = counts.get(&date).copied().unwrap_or(0);
                HeatmapCell {
                    date,
                    count,
                    level: intensity(count),
                }
            })
            .collect();
        Self { year, cells }
    }

    pub fn total(&self) -> i64 {
        self.cells.iter().map(|c| c.count).sum()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// Cells arranged as seven weekday rows (Sunday first) by week columns.
    /// Slots before January 1st and after December 31st are `None`.
    pub fn grid(&self) -> [Vec<Option<u8>>; 7] {
        let offset = self
            .cells
            .first()
            .map(|c| c.date.weekday().num_days_from_sunday() as usize)
            .unwrap_or(0);
        let weeks = (self.cells.len() + offset).div_ceil(7);

        let mut rows: [Vec<Option<u8>>; 7] = Default::default();
        for row in rows.iter_mut() {
            row.resize(weeks, None);
        }
        for (i, cell) in self.cells.iter().enumerate() {
            let slot = i + offset;
            rows[slot % 7][slot / 7] = Some(cell.level);
        }
        rows
    }
}
