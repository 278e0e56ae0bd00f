use chrono::{NaiveDate, Weekday};
use timeline_planner::project::{Phase, Project, RecurringConfig, WeekOfMonth};
use timeline_planner::settings::{Holiday, WorkSlot, WorkingDaySettings};
use timeline_planner::validation::{
    ValidationError, validate_holiday_collection, validate_new_holiday, validate_phase,
    validate_phase_budget, validate_phase_collection, validate_project, validate_project_collection,
    validate_settings,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn negative_slot_duration_is_rejected() {
    let mut settings = WorkingDaySettings::standard_week();
    let mut slot = WorkSlot::hours(9, 17);
    slot.duration_hours = -1.0;
    settings.set_slots(Weekday::Tue, vec![slot]);
    assert!(matches!(
        validate_settings(&settings),
        Err(ValidationError::SlotDuration { weekday: Weekday::Tue, index: 0, .. })
    ));
    assert!(validate_settings(&WorkingDaySettings::standard_week()).is_ok());
}

#[test]
fn overlapping_holidays_are_rejected_but_adjacent_ones_are_fine() {
    let adjacent = vec![
        Holiday::new("h1", d(2024, 1, 1), d(2024, 1, 2), ""),
        Holiday::new("h2", d(2024, 1, 3), d(2024, 1, 4), ""),
    ];
    assert!(validate_holiday_collection(&adjacent).is_ok());

    let overlapping = vec![
        Holiday::new("h1", d(2024, 1, 1), d(2024, 1, 3), ""),
        Holiday::new("h2", d(2024, 1, 3), d(2024, 1, 4), ""),
    ];
    assert!(matches!(
        validate_holiday_collection(&overlapping),
        Err(ValidationError::HolidayOverlap { .. })
    ));
}

#[test]
fn new_holiday_may_replace_its_old_version() {
    let existing = vec![
        Holiday::new("h1", d(2024, 1, 1), d(2024, 1, 2), ""),
        Holiday::new("h2", d(2024, 1, 10), d(2024, 1, 12), ""),
    ];
    let moved = Holiday::new("h1", d(2024, 1, 2), d(2024, 1, 5), "");
    assert!(validate_new_holiday(&moved, &existing).is_ok());

    let clash = Holiday::new("h3", d(2024, 1, 11), d(2024, 1, 11), "");
    assert_eq!(
        validate_new_holiday(&clash, &existing),
        Err(ValidationError::HolidayOverlap {
            id: "h3".to_owned(),
            other: "h2".to_owned()
        })
    );

    let inverted = Holiday::new("h4", d(2024, 2, 2), d(2024, 2, 1), "");
    assert!(matches!(
        validate_new_holiday(&inverted, &existing),
        Err(ValidationError::HolidayRange { .. })
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let holidays = vec![
        Holiday::single("h1", d(2024, 1, 1), ""),
        Holiday::single("h1", d(2024, 2, 1), ""),
    ];
    assert!(matches!(
        validate_holiday_collection(&holidays),
        Err(ValidationError::DuplicateId { entity: "holiday", .. })
    ));

    let projects = vec![
        Project::new("p1", d(2024, 1, 1), d(2024, 1, 5), 1.0),
        Project::new("p1", d(2024, 2, 1), d(2024, 2, 5), 1.0),
    ];
    assert!(matches!(
        validate_project_collection(&projects),
        Err(ValidationError::DuplicateId { entity: "project", .. })
    ));
}

#[test]
fn project_rules() {
    let inverted = Project::new("p1", d(2024, 1, 5), d(2024, 1, 1), 1.0);
    assert!(matches!(validate_project(&inverted), Err(ValidationError::ProjectRange { .. })));
    // Continuous projects ignore their end date.
    assert!(validate_project(&inverted.clone().continuous()).is_ok());

    let tiny_negative = Project::new("p3", d(2024, 1, 1), d(2024, 1, 5), -1e-7);
    assert!(matches!(validate_project(&tiny_negative), Err(ValidationError::ProjectHours { .. })));

    let nan = Project::new("p2", d(2024, 1, 1), d(2024, 1, 5), f64::NAN);
    assert!(matches!(validate_project(&nan), Err(ValidationError::ProjectHours { .. })));
}

#[test]
fn phase_rules() {
    let inverted = Phase::fixed("ph1", "p1", d(2024, 1, 5), d(2024, 1, 1), 2.0);
    assert!(matches!(validate_phase(&inverted), Err(ValidationError::PhaseRange { .. })));

    let negative = Phase::fixed("ph2", "p1", d(2024, 1, 1), d(2024, 1, 5), -2.0);
    assert!(matches!(validate_phase(&negative), Err(ValidationError::PhaseHours { .. })));

    let zero_interval = Phase::recurring("ph3", "p1", d(2024, 1, 1), 1.0, RecurringConfig::daily(0));
    assert!(matches!(validate_phase(&zero_interval), Err(ValidationError::Recurrence { .. })));

    let bad_date = Phase::recurring("ph4", "p1", d(2024, 1, 1), 1.0, RecurringConfig::monthly_on_date(1, 32));
    assert!(matches!(validate_phase(&bad_date), Err(ValidationError::Recurrence { .. })));

    let tiny_negative = Phase::fixed("ph6", "p1", d(2024, 1, 1), d(2024, 1, 5), -1e-7);
    assert!(matches!(validate_phase(&tiny_negative), Err(ValidationError::PhaseHours { .. })));
    let zero = Phase::fixed("ph7", "p1", d(2024, 1, 1), d(2024, 1, 5), 0.0);
    assert!(validate_phase(&zero).is_ok());

    let mut missing = Phase::recurring("ph5", "p1", d(2024, 1, 1), 1.0, RecurringConfig::daily(1));
    missing.recurring_config = None;
    assert!(matches!(validate_phase(&missing), Err(ValidationError::Recurrence { .. })));
}

#[test]
fn phases_must_reference_known_projects() {
    let projects = vec![Project::new("p1", d(2024, 1, 1), d(2024, 1, 5), 10.0)];
    let phases = vec![Phase::fixed("ph1", "p9", d(2024, 1, 1), d(2024, 1, 5), 2.0)];
    assert_eq!(
        validate_phase_collection(&phases, &projects),
        Err(ValidationError::UnknownProject {
            id: "ph1".to_owned(),
            project_id: "p9".to_owned()
        })
    );
}

#[test]
fn fixed_phase_budget_must_fit_the_estimate() {
    let project = Project::new("p1", d(2024, 1, 1), d(2024, 1, 31), 10.0);
    let fits = vec![
        Phase::fixed("ph1", "p1", d(2024, 1, 1), d(2024, 1, 5), 6.0),
        Phase::fixed("ph2", "p1", d(2024, 1, 8), d(2024, 1, 12), 4.0),
        Phase::recurring("ph3", "p1", d(2024, 1, 1), 50.0, RecurringConfig::daily(1)),
    ];
    assert!(validate_phase_budget(&project, &fits).is_ok());

    let over = vec![
        Phase::fixed("ph1", "p1", d(2024, 1, 1), d(2024, 1, 5), 6.0),
        Phase::fixed("ph2", "p1", d(2024, 1, 8), d(2024, 1, 12), 5.0),
    ];
    assert!(matches!(
        validate_phase_budget(&project, &over),
        Err(ValidationError::BudgetExceeded { .. })
    ));
}

#[test]
fn monthly_weekday_rule_needs_both_fields() {
    let complete = RecurringConfig::monthly_on_weekday(1, WeekOfMonth::Last, Weekday::Fri);
    let phase = Phase::recurring("ph1", "p1", d(2024, 1, 1), 1.0, complete.clone());
    assert!(validate_phase(&phase).is_ok());

    let mut no_week = complete.clone();
    no_week.monthly_week_of_month = None;
    let phase = Phase::recurring("ph2", "p1", d(2024, 1, 1), 1.0, no_week);
    assert!(matches!(validate_phase(&phase), Err(ValidationError::Recurrence { .. })));

    let mut no_day = complete;
    no_day.monthly_day_of_week = None;
    let phase = Phase::recurring("ph3", "p1", d(2024, 1, 1), 1.0, no_day);
    assert!(matches!(validate_phase(&phase), Err(ValidationError::Recurrence { .. })));
}
