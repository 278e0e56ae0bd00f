use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::estimate::{DayEstimate, EstimateSource};
use crate::event::{CalendarEvent, EventType};

/// Planned and completed hours booked on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayHours {
    pub planned: f64,
    pub completed: f64,
}

impl DayHours {
    pub fn total(&self) -> f64 {
        self.planned + self.completed
    }

    /// Any committed time keeps the day out of auto-estimation.
    pub fn is_blocked(&self) -> bool {
        self.total() > 0.0
    }

    fn add(&mut self, event_type: EventType, hours: f64) {
        if event_type.counts_as_completed() {
            self.completed += hours;
        } else {
            self.planned += hours;
        }
    }
}

/// One project's events bucketed by the calendar day they start on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDayAggregator {
    project_id: String,
    days: BTreeMap<NaiveDate, DayHours>,
}

impl EventDayAggregator {
    pub fn for_project(events: &[CalendarEvent], project_id: &str) -> Self {
        let mut days: BTreeMap<NaiveDate, DayHours> = BTreeMap::new();
        for event in events.iter().filter(|event| event.belongs_to(project_id)) {
            days.entry(event.day())
                .or_default()
                .add(event.event_type, event.hours());
        }
        Self {
            project_id: project_id.to_owned(),
            days,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn hours_on(&self, date: NaiveDate) -> DayHours {
        self.days.get(&date).copied().unwrap_or_default()
    }

    /// Days with booked time inside `range`, ascending.
    pub fn days_in(&self, range: RangeInclusive<NaiveDate>) -> impl Iterator<Item = (NaiveDate, DayHours)> + '_ {
        let (start, end) = range.into_inner();
        // BTreeMap::range panics on inverted bounds.
        let empty = start > end;
        let start = if empty { end } else { start };
        self.days
            .range(start..=end)
            .filter(move |_| !empty)
            .map(|(date, hours)| (*date, *hours))
    }

    /// Total planned plus completed hours between `start` and `end`, inclusive.
    pub fn consumed_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        if start > end {
            return 0.0;
        }
        self.days_in(start..=end).map(|(_, hours)| hours.total()).sum()
    }

    pub fn planned_total(&self) -> f64 {
        self.days.values().map(|hours| hours.planned).sum()
    }

    pub fn completed_total(&self) -> f64 {
        self.days.values().map(|hours| hours.completed).sum()
    }

    /// One event-sourced row per day with booked time.
    pub fn to_day_estimates(&self) -> Vec<DayEstimate> {
        self.days
            .iter()
            .filter(|(_, hours)| hours.is_blocked())
            .map(|(date, hours)| DayEstimate {
                date: *date,
                hours: hours.total(),
                project_id: self.project_id.clone(),
                phase_id: None,
                source: EstimateSource::Event,
                is_planned_event: hours.planned > 0.0,
                is_completed_event: hours.completed > 0.0,
            })
            .collect()
    }
}
