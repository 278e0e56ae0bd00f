use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A budgeted block of work placed on a timeline row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_hours: f64,
    /// Open-ended projects run until the caller's horizon instead of `end_date`.
    #[serde(default)]
    pub continuous: bool,
    #[serde(default)]
    pub row_id: String,
    #[serde(default)]
    pub group_id: String,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        estimated_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date,
            end_date,
            estimated_hours,
            continuous: false,
            row_id: String::new(),
            group_id: String::new(),
        }
    }

    pub fn on_row(mut self, row_id: impl Into<String>) -> Self {
        self.row_id = row_id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    /// The inclusive allocation window. Continuous projects end at `horizon_end`.
    pub fn allocation_window(&self, horizon_end: NaiveDate) -> (NaiveDate, NaiveDate) {
        if self.continuous {
            (self.start_date, horizon_end)
        } else {
            (self.start_date, self.end_date)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringType {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyPattern {
    #[default]
    Date,
    DayOfWeek,
}

/// Which occurrence of a weekday inside a month a monthly rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    /// Only exists in some months; months without one are skipped.
    Fifth,
    SecondLast,
    Last,
}

impl WeekOfMonth {
    /// Ordinal counted from the start of the month, `None` for end-relative variants.
    pub fn ordinal(self) -> Option<u32> {
        match self {
            WeekOfMonth::First => Some(1),
            WeekOfMonth::Second => Some(2),
            WeekOfMonth::Third => Some(3),
            WeekOfMonth::Fourth => Some(4),
            WeekOfMonth::Fifth => Some(5),
            WeekOfMonth::SecondLast | WeekOfMonth::Last => None,
        }
    }

    /// Ordinal counted back from the end of the month (1 = last).
    pub fn ordinal_from_end(self) -> Option<u32> {
        match self {
            WeekOfMonth::Last => Some(1),
            WeekOfMonth::SecondLast => Some(2),
            _ => None,
        }
    }
}

fn default_interval() -> u32 {
    1
}

fn default_span_days() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringConfig {
    #[serde(rename = "type")]
    pub recurring_type: RecurringType,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_day_of_week: Option<Weekday>,
    #[serde(default)]
    pub monthly_pattern: MonthlyPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_date: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_week_of_month: Option<WeekOfMonth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_day_of_week: Option<Weekday>,
    /// Number of days each occurrence covers, starting at the occurrence date.
    #[serde(default = "default_span_days")]
    pub occurrence_span_days: u32,
}

impl RecurringConfig {
    fn base(recurring_type: RecurringType, interval: u32) -> Self {
        Self {
            recurring_type,
            interval,
            weekly_day_of_week: None,
            monthly_pattern: MonthlyPattern::Date,
            monthly_date: None,
            monthly_week_of_month: None,
            monthly_day_of_week: None,
            occurrence_span_days: 1,
        }
    }

    pub fn daily(interval: u32) -> Self {
        Self::base(RecurringType::Daily, interval)
    }

    pub fn weekly(interval: u32, day: Weekday) -> Self {
        Self {
            weekly_day_of_week: Some(day),
            ..Self::base(RecurringType::Weekly, interval)
        }
    }

    pub fn monthly_on_date(interval: u32, day_of_month: u32) -> Self {
        Self {
            monthly_pattern: MonthlyPattern::Date,
            monthly_date: Some(day_of_month),
            ..Self::base(RecurringType::Monthly, interval)
        }
    }

    pub fn monthly_on_weekday(interval: u32, week: WeekOfMonth, day: Weekday) -> Self {
        Self {
            monthly_pattern: MonthlyPattern::DayOfWeek,
            monthly_week_of_month: Some(week),
            monthly_day_of_week: Some(day),
            ..Self::base(RecurringType::Monthly, interval)
        }
    }

    pub fn spanning(mut self, days: u32) -> Self {
        self.occurrence_span_days = days;
        self
    }
}

/// A named sub-allocation of a project's hours, either fixed-window or recurring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Window end for fixed phases, pattern anchor for recurring ones.
    pub end_date: NaiveDate,
    pub time_allocation_hours: f64,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_config: Option<RecurringConfig>,
}

impl Phase {
    pub fn fixed(
        id: impl Into<String>,
        project_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_allocation_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: String::new(),
            start_date: Some(start_date),
            end_date,
            time_allocation_hours,
            is_recurring: false,
            recurring_config: None,
        }
    }

    pub fn recurring(
        id: impl Into<String>,
        project_id: impl Into<String>,
        anchor: NaiveDate,
        time_allocation_hours: f64,
        config: RecurringConfig,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: String::new(),
            start_date: None,
            end_date: anchor,
            time_allocation_hours,
            is_recurring: true,
            recurring_config: Some(config),
        }
    }

    /// Recurring config, if this phase is recurring and carries one.
    pub fn recurrence(&self) -> Option<&RecurringConfig> {
        if self.is_recurring {
            self.recurring_config.as_ref()
        } else {
            None
        }
    }
}
