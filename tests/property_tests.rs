use chrono::{Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use timeline_planner::calculations::{DayEstimateAllocator, EventDayAggregator, RecurringPatternExpander};
use timeline_planner::calendar::{WorkingDayCalendar, WorkingDays};
use timeline_planner::config::EngineConfig;
use timeline_planner::drag::{DragAction, resolve_collision};
use timeline_planner::event::{CalendarEvent, EventType};
use timeline_planner::project::{Project, RecurringConfig, WeekOfMonth};
use timeline_planner::settings::{Holiday, WorkingDaySettings};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn planned(project: &str, date: NaiveDate, hours: u32) -> CalendarEvent {
    CalendarEvent::new(
        format!("{project}-{date}"),
        Some(project),
        date.and_hms_opt(8, 0, 0).unwrap(),
        date.and_hms_opt(8 + hours, 0, 0).unwrap(),
        EventType::Planned,
    )
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const WEEKS: [WeekOfMonth; 7] = [
    WeekOfMonth::First,
    WeekOfMonth::Second,
    WeekOfMonth::Third,
    WeekOfMonth::Fourth,
    WeekOfMonth::Fifth,
    WeekOfMonth::SecondLast,
    WeekOfMonth::Last,
];

fn recurring_config() -> impl Strategy<Value = RecurringConfig> {
    (
        0u8..4,
        1u32..6,
        proptest::sample::select(WEEKDAYS.to_vec()),
        proptest::sample::select(WEEKS.to_vec()),
        1u32..32,
        1u32..10,
    )
        .prop_map(|(kind, interval, weekday, week, day, span)| {
            let config = match kind {
                0 => RecurringConfig::daily(interval),
                1 => RecurringConfig::weekly(interval, weekday),
                2 => RecurringConfig::monthly_on_date(interval, day),
                _ => RecurringConfig::monthly_on_weekday(interval, week, weekday),
            };
            config.spanning(span)
        })
}

proptest! {
    #[test]
    fn recurring_occurrences_stay_inside_the_window(
        config in recurring_config(),
        anchor_offset in -800i64..800,
        start_offset in 0i64..400,
        length in 0i64..400,
    ) {
        let anchor = base() + Duration::days(anchor_offset);
        let window_start = base() + Duration::days(start_offset);
        let window_end = window_start + Duration::days(length);
        let expander = RecurringPatternExpander::new(&config, anchor, 500);

        let dates = expander.occurrences(window_start, window_end);
        for date in &dates {
            prop_assert!(*date >= window_start && *date <= window_end);
        }
        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }

        let windows = expander.occurrence_windows(window_start, window_end);
        prop_assert_eq!(windows.len(), dates.len());
        for (first, last) in &windows {
            prop_assert!(first <= last);
            prop_assert!(*first >= window_start && *last <= window_end);
        }
        for pair in windows.windows(2) {
            prop_assert!(pair[0].1 < pair[1].0);
        }
    }

    #[test]
    fn allocation_conserves_the_unconsumed_budget(
        length in 0i64..40,
        budget in 1u32..400,
        event_days in proptest::collection::btree_set(0i64..40, 0..6),
        holiday_offset in 0i64..40,
    ) {
        let start = base();
        let end = start + Duration::days(length);
        let project = Project::new("p1", start, end, f64::from(budget));
        let events: Vec<CalendarEvent> = event_days
            .iter()
            .map(|offset| planned("p1", start + Duration::days(*offset), 2))
            .collect();
        let holidays = vec![Holiday::single("h1", start + Duration::days(holiday_offset), "")];
        let settings = WorkingDaySettings::standard_week();
        let config = EngineConfig::default();
        let calendar = WorkingDayCalendar::new(&settings, &holidays);

        let rows = DayEstimateAllocator::new(&calendar, &events, &config).auto_estimates(&project, &[], None);
        let aggregator = EventDayAggregator::for_project(&events, "p1");
        let consumed = aggregator.consumed_between(start, end);
        let allocated: f64 = rows.iter().map(|row| row.hours).sum();

        for row in &rows {
            prop_assert!(row.date >= start && row.date <= end);
            prop_assert!(calendar.is_working_day(row.date));
            prop_assert!(!aggregator.hours_on(row.date).is_blocked());
            prop_assert!(row.hours > 0.0);
        }
        if rows.is_empty() {
            prop_assert!(consumed >= f64::from(budget) || calendar
                .working_days_between(start, end)
                .working_days
                .iter()
                .all(|day| aggregator.hours_on(*day).is_blocked()));
        } else {
            prop_assert!((allocated + consumed - f64::from(budget)).abs() < 1e-6);
        }
    }

    #[test]
    fn collision_resolution_keeps_the_gap(
        neighbour_len in 0i64..10,
        gap in 0i64..10,
        bar_len in 0i64..10,
        delta in -30i64..30,
        min_gap in 0u32..4,
    ) {
        let neighbour = (base(), base() + Duration::days(neighbour_len));
        let start = neighbour.1 + Duration::days(gap + i64::from(min_gap) + 1);
        let original = (start, start + Duration::days(bar_len));
        let candidate = (original.0 + Duration::days(delta), original.1 + Duration::days(delta));

        let (new_start, new_end) = resolve_collision(DragAction::Move, original, candidate, &[neighbour], min_gap);
        prop_assert_eq!(new_end - new_start, original.1 - original.0);
        prop_assert!(new_start > neighbour.1 + Duration::days(i64::from(min_gap)));
    }
}
