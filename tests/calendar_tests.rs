use chrono::{NaiveDate, Weekday};
use timeline_planner::calendar::{self, WorkingDayCalendar, WorkingDays};
use timeline_planner::settings::{Holiday, WorkSlot, WorkingDaySettings};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn standard_week_excludes_weekends() {
    let settings = WorkingDaySettings::standard_week();
    // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
    assert!(!calendar::is_working_day(d(2024, 1, 6), &settings, &[]));
    assert!(!calendar::is_working_day(d(2024, 1, 7), &settings, &[]));
    assert!(calendar::is_working_day(d(2024, 1, 8), &settings, &[]));
    assert_eq!(calendar::day_work_hours(d(2024, 1, 8), &settings), 8.0);
}

#[test]
fn holiday_blocks_a_configured_day() {
    let settings = WorkingDaySettings::standard_week();
    let holidays = vec![Holiday::new("h1", d(2024, 1, 2), d(2024, 1, 3), "Break")];
    let cal = WorkingDayCalendar::new(&settings, &holidays);
    assert!(cal.is_holiday(d(2024, 1, 2)));
    assert!(cal.is_holiday(d(2024, 1, 3)));
    assert!(!cal.is_working_day(d(2024, 1, 3)));
    assert!(cal.is_working_day(d(2024, 1, 4)));
}

#[test]
fn weekday_with_only_empty_slots_is_not_working() {
    let mut settings = WorkingDaySettings::standard_week();
    settings.set_slots(Weekday::Wed, vec![WorkSlot::hours(9, 9)]);
    // 2024-01-03 is a Wednesday
    assert!(!calendar::is_working_day(d(2024, 1, 3), &settings, &[]));
}

#[test]
fn working_days_between_counts_each_category() {
    let settings = WorkingDaySettings::standard_week();
    let holidays = vec![Holiday::single("h1", d(2024, 1, 3), "Midweek")];
    let summary = calendar::working_days_between(d(2024, 1, 1), d(2024, 1, 7), &settings, &holidays);
    assert_eq!(summary.total_days, 7);
    assert_eq!(summary.holiday_count, 1);
    assert_eq!(summary.working_day_count, 4);
    assert_eq!(
        summary.working_days,
        vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 4), d(2024, 1, 5)]
    );
}

#[test]
fn holiday_on_weekend_counts_as_holiday_not_working() {
    let settings = WorkingDaySettings::standard_week();
    let holidays = vec![Holiday::single("h1", d(2024, 1, 6), "Saturday off")];
    let summary = calendar::working_days_between(d(2024, 1, 6), d(2024, 1, 7), &settings, &holidays);
    assert_eq!(summary.total_days, 2);
    assert_eq!(summary.holiday_count, 1);
    assert_eq!(summary.working_day_count, 0);
}

#[test]
fn inverted_range_is_empty() {
    let settings = WorkingDaySettings::standard_week();
    let summary = calendar::working_days_between(d(2024, 1, 7), d(2024, 1, 1), &settings, &[]);
    assert_eq!(summary.total_days, 0);
    assert!(summary.working_days.is_empty());
}

#[test]
fn remaining_days_exclude_today() {
    let settings = WorkingDaySettings::standard_week();
    // Monday to Friday of the same week: Tue, Wed, Thu, Fri remain
    assert_eq!(
        calendar::working_days_remaining(d(2024, 1, 5), &settings, &[], d(2024, 1, 1)),
        4
    );
    assert_eq!(
        calendar::working_days_remaining(d(2024, 1, 1), &settings, &[], d(2024, 1, 1)),
        0
    );
    assert_eq!(
        calendar::working_days_remaining(d(2023, 12, 29), &settings, &[], d(2024, 1, 1)),
        0
    );
}

#[test]
fn remaining_days_skip_holidays() {
    let settings = WorkingDaySettings::standard_week();
    let holidays = vec![Holiday::single("h1", d(2024, 1, 4), "Thursday off")];
    assert_eq!(
        calendar::working_days_remaining(d(2024, 1, 5), &settings, &holidays, d(2024, 1, 1)),
        3
    );
}

#[test]
fn uniform_settings_make_every_day_working() {
    let settings = WorkingDaySettings::uniform(4.0);
    let summary = calendar::working_days_between(d(2024, 1, 1), d(2024, 1, 14), &settings, &[]);
    assert_eq!(summary.working_day_count, 14);
    assert_eq!(settings.weekly_hours(), 28.0);
}
