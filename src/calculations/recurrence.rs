use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use tracing::{trace, warn};

use crate::project::{MonthlyPattern, RecurringConfig, RecurringType, WeekOfMonth};

/// Expands a recurring rule into concrete dates inside a window.
///
/// Intervals are counted from the anchor: the first period considered is the
/// one that starts at or before the window start, so a window that opens mid
/// period does not get a truncated first interval.
pub struct RecurringPatternExpander<'a> {
    config: &'a RecurringConfig,
    anchor: NaiveDate,
    max_iterations: u32,
}

impl<'a> RecurringPatternExpander<'a> {
    pub fn new(config: &'a RecurringConfig, anchor: NaiveDate, max_iterations: u32) -> Self {
        Self {
            config,
            anchor,
            max_iterations,
        }
    }

    /// Ascending, de-duplicated occurrence dates within `[window_start, window_end]`.
    pub fn occurrences(&self, window_start: NaiveDate, window_end: NaiveDate) -> Vec<NaiveDate> {
        if window_start > window_end {
            return Vec::new();
        }
        if self.config.interval == 0 {
            warn!(anchor = %self.anchor, "recurring rule with zero interval ignored");
            return Vec::new();
        }

        let mut dates = match self.config.recurring_type {
            RecurringType::Daily => self.daily(window_start, window_end),
            RecurringType::Weekly => self.weekly(window_start, window_end),
            RecurringType::Monthly => self.monthly(window_start, window_end),
        };
        dates.sort_unstable();
        dates.dedup();
        trace!(count = dates.len(), %window_start, %window_end, "expanded recurring rule");
        dates
    }

    /// Each occurrence paired with the last day it covers, clipped to the window.
    /// A window also stops the day before the next occurrence, so spans longer
    /// than the pattern's step never share a day.
    pub fn occurrence_windows(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Vec<(NaiveDate, NaiveDate)> {
        let span = u64::from(self.config.occurrence_span_days.max(1));
        let dates = self.occurrences(window_start, window_end);
        dates
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                let mut last = date
                    .checked_add_days(Days::new(span - 1))
                    .unwrap_or(window_end)
                    .min(window_end);
                if let Some(next) = dates.get(i + 1).and_then(|next| next.pred_opt()) {
                    last = last.min(next);
                }
                (date, last)
            })
            .collect()
    }

    fn daily(&self, window_start: NaiveDate, window_end: NaiveDate) -> Vec<NaiveDate> {
        let step = i64::from(self.config.interval);
        let periods = (window_start - self.anchor).num_days().div_euclid(step);
        let first = self.anchor + Duration::days(periods * step);
        self.collect_stepped(window_start, window_end, |i| {
            let date = first + Duration::days(i * step);
            (date, Some(date))
        })
    }

    fn weekly(&self, window_start: NaiveDate, window_end: NaiveDate) -> Vec<NaiveDate> {
        let target = self
            .config
            .weekly_day_of_week
            .unwrap_or_else(|| self.anchor.weekday());
        let step_days = i64::from(self.config.interval) * 7;
        let anchor_week = week_start(self.anchor);
        let periods = (week_start(window_start) - anchor_week)
            .num_days()
            .div_euclid(step_days);
        let first_week = anchor_week + Duration::days(periods * step_days);
        let offset = i64::from(target.num_days_from_sunday());
        self.collect_stepped(window_start, window_end, |i| {
            let week = first_week + Duration::days(i * step_days);
            (week, Some(week + Duration::days(offset)))
        })
    }

    fn monthly(&self, window_start: NaiveDate, window_end: NaiveDate) -> Vec<NaiveDate> {
        let step = i64::from(self.config.interval);
        let anchor_index = month_index(self.anchor);
        let periods = (month_index(window_start) - anchor_index).div_euclid(step);
        let first_index = anchor_index + periods * step;
        self.collect_stepped(window_start, window_end, |i| {
            let (year, month) = from_month_index(first_index + i * step);
            let period_start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX);
            (period_start, self.monthly_candidate(year, month))
        })
    }

    fn monthly_candidate(&self, year: i32, month: u32) -> Option<NaiveDate> {
        match self.config.monthly_pattern {
            MonthlyPattern::Date => {
                let wanted = self.config.monthly_date.unwrap_or_else(|| self.anchor.day());
                let day = wanted.clamp(1, days_in_month(year, month));
                NaiveDate::from_ymd_opt(year, month, day)
            }
            MonthlyPattern::DayOfWeek => {
                let weekday = self
                    .config
                    .monthly_day_of_week
                    .unwrap_or_else(|| self.anchor.weekday());
                let week = self
                    .config
                    .monthly_week_of_month
                    .unwrap_or(WeekOfMonth::First);
                weekday_in_month(year, month, weekday, week)
            }
        }
    }

    /// Drive a stepped sequence. `step(i)` yields the period start used for the
    /// stop test and the candidate inside that period, if the period has one.
    fn collect_stepped<F>(&self, window_start: NaiveDate, window_end: NaiveDate, step: F) -> Vec<NaiveDate>
    where
        F: Fn(i64) -> (NaiveDate, Option<NaiveDate>),
    {
        let mut dates = Vec::new();
        for i in 0..i64::from(self.max_iterations) {
            let (period_start, candidate) = step(i);
            if period_start > window_end {
                break;
            }
            match candidate {
                Some(date) if date >= window_start && date <= window_end => dates.push(date),
                Some(_) => {}
                None => trace!(%period_start, "period has no occurrence, skipped"),
            }
        }
        dates
    }
}

/// Sunday on or before `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// The `n`th `weekday` of a month counted from the start, `None` if it does not exist.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = (7 + weekday.num_days_from_sunday() - first.weekday().num_days_from_sunday()) % 7;
    let day = 1 + lead + (n - 1) * 7;
    if day > days_in_month(year, month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The `n`th `weekday` of a month counted back from the end (1 = last).
pub fn nth_last_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    let trail = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    let back = trail + (n - 1) * 7;
    if back >= last.day() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, last.day() - back)
}

pub fn weekday_in_month(year: i32, month: u32, weekday: Weekday, week: WeekOfMonth) -> Option<NaiveDate> {
    match (week.ordinal(), week.ordinal_from_end()) {
        (Some(n), _) => nth_weekday_of_month(year, month, weekday, n),
        (None, Some(n)) => nth_last_weekday_of_month(year, month, weekday, n),
        (None, None) => None,
    }
}
