use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A single block of working time within a weekday template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Length of the slot in hours. Must be non-negative.
    pub duration_hours: f64,
}

impl WorkSlot {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let minutes = (end_time - start_time).num_minutes().max(0);
        Self {
            start_time,
            end_time,
            duration_hours: minutes as f64 / 60.0,
        }
    }

    /// Convenience constructor for whole-hour slots, e.g. `WorkSlot::hours(9, 17)`.
    pub fn hours(start_hour: u32, end_hour: u32) -> Self {
        let start = NaiveTime::from_hms_opt(start_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        let end = NaiveTime::from_hms_opt(end_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(start, end)
    }
}

/// Weekly work-hour template, one ordered slot list per weekday.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkingDaySettings {
    #[serde(default)]
    pub sunday: Vec<WorkSlot>,
    #[serde(default)]
    pub monday: Vec<WorkSlot>,
    #[serde(default)]
    pub tuesday: Vec<WorkSlot>,
    #[serde(default)]
    pub wednesday: Vec<WorkSlot>,
    #[serde(default)]
    pub thursday: Vec<WorkSlot>,
    #[serde(default)]
    pub friday: Vec<WorkSlot>,
    #[serde(default)]
    pub saturday: Vec<WorkSlot>,
}

impl WorkingDaySettings {
    pub const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Monday to Friday, 09:00-17:00.
    pub fn standard_week() -> Self {
        let day = vec![WorkSlot::hours(9, 17)];
        Self {
            monday: day.clone(),
            tuesday: day.clone(),
            wednesday: day.clone(),
            thursday: day.clone(),
            friday: day,
            ..Self::default()
        }
    }

    /// Every weekday gets the same single slot of `hours` length starting at 09:00.
    pub fn uniform(hours: f64) -> Self {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let slot = WorkSlot {
            start_time: start,
            end_time: start + chrono::Duration::minutes((hours.max(0.0) * 60.0) as i64),
            duration_hours: hours.max(0.0),
        };
        let mut settings = Self::default();
        for weekday in Self::ALL_WEEKDAYS {
            settings.set_slots(weekday, vec![slot.clone()]);
        }
        settings
    }

    pub fn slots(&self, weekday: Weekday) -> &[WorkSlot] {
        match weekday {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }

    pub fn set_slots(&mut self, weekday: Weekday, slots: Vec<WorkSlot>) {
        let target = match weekday {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *target = slots;
    }

    /// Nominal hours for a weekday; negative or non-finite durations count as zero.
    pub fn weekday_hours(&self, weekday: Weekday) -> f64 {
        self.slots(weekday)
            .iter()
            .map(|slot| slot.duration_hours)
            .filter(|hours| hours.is_finite() && *hours > 0.0)
            .sum()
    }

    pub fn weekly_hours(&self) -> f64 {
        Self::ALL_WEEKDAYS
            .iter()
            .map(|wd| self.weekday_hours(*wd))
            .sum()
    }

    /// Stable hash of the template, used as a cache key component.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for weekday in Self::ALL_WEEKDAYS {
            weekday.num_days_from_sunday().hash(&mut hasher);
            for slot in self.slots(weekday) {
                slot.start_time.hash(&mut hasher);
                slot.end_time.hash(&mut hasher);
                slot.duration_hours.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// An inclusive range of days off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub name: String,
}

impl Holiday {
    pub fn new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
            name: name.into(),
        }
    }

    pub fn single(id: impl Into<String>, date: NaiveDate, name: impl Into<String>) -> Self {
        Self::new(id, date, date, name)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Order-independent hash of a holiday list.
pub fn holidays_fingerprint(holidays: &[Holiday]) -> u64 {
    let mut ranges: Vec<(i32, i32)> = holidays
        .iter()
        .map(|h| (h.start_date.num_days_from_ce(), h.end_date.num_days_from_ce()))
        .collect();
    ranges.sort_unstable();
    let mut hasher = DefaultHasher::new();
    ranges.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_hours_ignore_negative_durations() {
        let mut settings = WorkingDaySettings::default();
        let mut slot = WorkSlot::hours(9, 12);
        slot.duration_hours = -2.0;
        settings.set_slots(Weekday::Mon, vec![slot, WorkSlot::hours(13, 15)]);
        assert_eq!(settings.weekday_hours(Weekday::Mon), 2.0);
    }

    #[test]
    fn fingerprint_changes_with_template() {
        let a = WorkingDaySettings::standard_week();
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.set_slots(Weekday::Sat, vec![WorkSlot::hours(10, 12)]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn holiday_fingerprint_is_order_independent() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let a = vec![Holiday::single("a", d1, ""), Holiday::single("b", d2, "")];
        let b = vec![Holiday::single("b", d2, ""), Holiday::single("a", d1, "")];
        assert_eq!(holidays_fingerprint(&a), holidays_fingerprint(&b));
    }
}
