use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::settings::{Holiday, WorkingDaySettings};

/// Per-day classification shared by the plain and cached calendars.
pub trait WorkingDays {
    /// True if `date` falls inside any holiday range (inclusive).
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Nominal hours configured for the weekday of `date`, ignoring holidays.
    fn day_work_hours(&self, date: NaiveDate) -> f64;

    /// A working day has configured hours and no holiday on it.
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_holiday(date) && self.day_work_hours(date) > 0.0
    }

    /// Walk `[start, end]` one day at a time and classify each day.
    fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> WorkingDaysSummary {
        let mut summary = WorkingDaysSummary::default();
        for date in DayRange::new(start, end) {
            summary.total_days += 1;
            if self.is_holiday(date) {
                summary.holiday_count += 1;
            } else if self.day_work_hours(date) > 0.0 {
                summary.working_days.push(date);
            }
        }
        summary.working_day_count = summary.working_days.len() as u32;
        summary
    }

    /// Working days strictly after `today` up to and including `end_date`.
    fn working_days_remaining(&self, end_date: NaiveDate, today: NaiveDate) -> u32 {
        if end_date <= today {
            return 0;
        }
        DayRange::new(today + Duration::days(1), end_date)
            .filter(|date| self.is_working_day(*date))
            .count() as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkingDaysSummary {
    pub working_days: Vec<NaiveDate>,
    pub total_days: u32,
    pub working_day_count: u32,
    pub holiday_count: u32,
}

/// Calendar derived from a weekly template and a holiday list. Holds no state
/// of its own, so it is cheap to build per computation.
#[derive(Debug, Clone, Copy)]
pub struct WorkingDayCalendar<'a> {
    settings: &'a WorkingDaySettings,
    holidays: &'a [Holiday],
}

impl<'a> WorkingDayCalendar<'a> {
    pub fn new(settings: &'a WorkingDaySettings, holidays: &'a [Holiday]) -> Self {
        Self { settings, holidays }
    }

    pub fn settings(&self) -> &'a WorkingDaySettings {
        self.settings
    }

    pub fn holidays(&self) -> &'a [Holiday] {
        self.holidays
    }
}

impl WorkingDays for WorkingDayCalendar<'_> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|holiday| holiday.contains(date))
    }

    fn day_work_hours(&self, date: NaiveDate) -> f64 {
        self.settings.weekday_hours(date.weekday())
    }
}

pub fn is_working_day(date: NaiveDate, settings: &WorkingDaySettings, holidays: &[Holiday]) -> bool {
    WorkingDayCalendar::new(settings, holidays).is_working_day(date)
}

pub fn day_work_hours(date: NaiveDate, settings: &WorkingDaySettings) -> f64 {
    settings.weekday_hours(date.weekday())
}

pub fn working_days_between(
    start: NaiveDate,
    end: NaiveDate,
    settings: &WorkingDaySettings,
    holidays: &[Holiday],
) -> WorkingDaysSummary {
    WorkingDayCalendar::new(settings, holidays).working_days_between(start, end)
}

pub fn working_days_remaining(
    end_date: NaiveDate,
    settings: &WorkingDaySettings,
    holidays: &[Holiday],
    today: NaiveDate,
) -> u32 {
    WorkingDayCalendar::new(settings, holidays).working_days_remaining(end_date, today)
}

/// Inclusive iterator over consecutive days. Empty when `start > end`.
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }
}
