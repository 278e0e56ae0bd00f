use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Planned,
    Completed,
    Tracked,
}

impl EventType {
    /// Tracked time is booked against the budget the same way completed work is.
    pub fn counts_as_completed(self) -> bool {
        matches!(self, EventType::Completed | EventType::Tracked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Planned => "planned",
            EventType::Completed => "completed",
            EventType::Tracked => "tracked",
        }
    }
}

/// A scheduled or logged block of time on the user's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Explicit duration in hours; derived from the time span when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        project_id: Option<&str>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        event_type: EventType,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.map(ToOwned::to_owned),
            start_time,
            end_time,
            event_type,
            duration_hours: None,
        }
    }

    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    /// Calendar day the event is bucketed under.
    pub fn day(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Booked hours, never negative. Non-finite explicit durations count as zero.
    pub fn hours(&self) -> f64 {
        let hours = match self.duration_hours {
            Some(hours) => hours,
            None => (self.end_time - self.start_time).num_minutes() as f64 / 60.0,
        };
        if hours.is_finite() { hours.max(0.0) } else { 0.0 }
    }

    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }
}
