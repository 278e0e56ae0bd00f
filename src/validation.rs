use std::collections::HashSet;

use chrono::Weekday;
use thiserror::Error;

use crate::project::{MonthlyPattern, Phase, Project, RecurringType};
use crate::settings::{Holiday, WorkingDaySettings};

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{weekday} slot #{index} has invalid duration {duration}")]
    SlotDuration {
        weekday: Weekday,
        index: usize,
        duration: String,
    },
    #[error("holiday {id} starts on {start} after it ends on {end}")]
    HolidayRange { id: String, start: String, end: String },
    #[error("holiday {id} overlaps holiday {other}")]
    HolidayOverlap { id: String, other: String },
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: String },
    #[error("project {id} starts on {start} after it ends on {end}")]
    ProjectRange { id: String, start: String, end: String },
    #[error("project {id} has invalid estimated hours {hours}")]
    ProjectHours { id: String, hours: String },
    #[error("phase {id} has invalid time allocation {hours}")]
    PhaseHours { id: String, hours: String },
    #[error("phase {id} starts on {start} after it ends on {end}")]
    PhaseRange { id: String, start: String, end: String },
    #[error("phase {id} refers to unknown project {project_id}")]
    UnknownProject { id: String, project_id: String },
    #[error("phase {id}: {message}")]
    Recurrence { id: String, message: String },
    #[error("project {id}: fixed phases allocate {allocated:.2}h but the estimate is {estimated:.2}h")]
    BudgetExceeded {
        id: String,
        allocated: f64,
        estimated: f64,
    },
    #[error("unknown phase {0}")]
    UnknownPhase(String),
}

pub fn validate_settings(settings: &WorkingDaySettings) -> Result<(), ValidationError> {
    for weekday in WorkingDaySettings::ALL_WEEKDAYS {
        for (index, slot) in settings.slots(weekday).iter().enumerate() {
            if !slot.duration_hours.is_finite() || slot.duration_hours < 0.0 {
                return Err(ValidationError::SlotDuration {
                    weekday,
                    index,
                    duration: slot.duration_hours.to_string(),
                });
            }
        }
    }
    Ok(())
}

pub fn validate_holiday(holiday: &Holiday) -> Result<(), ValidationError> {
    if holiday.start_date > holiday.end_date {
        return Err(ValidationError::HolidayRange {
            id: holiday.id.clone(),
            start: holiday.start_date.to_string(),
            end: holiday.end_date.to_string(),
        });
    }
    Ok(())
}

/// Check that `candidate` can be added next to `existing` without overlapping.
/// An entry with the candidate's id is treated as the candidate's old version.
pub fn validate_new_holiday(candidate: &Holiday, existing: &[Holiday]) -> Result<(), ValidationError> {
    validate_holiday(candidate)?;
    if let Some(other) = existing
        .iter()
        .filter(|other| other.id != candidate.id)
        .find(|other| other.overlaps(candidate.start_date, candidate.end_date))
    {
        return Err(ValidationError::HolidayOverlap {
            id: candidate.id.clone(),
            other: other.id.clone(),
        });
    }
    Ok(())
}

pub fn validate_holiday_collection(holidays: &[Holiday]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(holidays.len());
    for holiday in holidays {
        if !seen.insert(holiday.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                entity: "holiday",
                id: holiday.id.clone(),
            });
        }
        validate_holiday(holiday)?;
    }

    let mut sorted: Vec<&Holiday> = holidays.iter().collect();
    sorted.sort_by_key(|h| (h.start_date, h.end_date));
    for pair in sorted.windows(2) {
        if pair[1].start_date <= pair[0].end_date {
            return Err(ValidationError::HolidayOverlap {
                id: pair[1].id.clone(),
                other: pair[0].id.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if !project.continuous && project.start_date > project.end_date {
        return Err(ValidationError::ProjectRange {
            id: project.id.clone(),
            start: project.start_date.to_string(),
            end: project.end_date.to_string(),
        });
    }
    if !project.estimated_hours.is_finite() || project.estimated_hours < 0.0 {
        return Err(ValidationError::ProjectHours {
            id: project.id.clone(),
            hours: project.estimated_hours.to_string(),
        });
    }
    Ok(())
}

pub fn validate_phase(phase: &Phase) -> Result<(), ValidationError> {
    if !phase.time_allocation_hours.is_finite() || phase.time_allocation_hours < 0.0 {
        return Err(ValidationError::PhaseHours {
            id: phase.id.clone(),
            hours: phase.time_allocation_hours.to_string(),
        });
    }

    if !phase.is_recurring {
        if let Some(start) = phase.start_date {
            if start > phase.end_date {
                return Err(ValidationError::PhaseRange {
                    id: phase.id.clone(),
                    start: start.to_string(),
                    end: phase.end_date.to_string(),
                });
            }
        }
        return Ok(());
    }

    let recurrence_error = |message: &str| ValidationError::Recurrence {
        id: phase.id.clone(),
        message: message.to_owned(),
    };
    let Some(config) = phase.recurring_config.as_ref() else {
        return Err(recurrence_error("recurring phase requires a recurring config"));
    };
    if config.interval == 0 {
        return Err(recurrence_error("interval must be at least 1"));
    }
    if config.occurrence_span_days == 0 {
        return Err(recurrence_error("occurrence span must be at least 1 day"));
    }
    if config.recurring_type == RecurringType::Monthly {
        match config.monthly_pattern {
            MonthlyPattern::Date => {
                if let Some(day) = config.monthly_date {
                    if !(1..=31).contains(&day) {
                        return Err(recurrence_error("monthly date must be between 1 and 31"));
                    }
                }
            }
            MonthlyPattern::DayOfWeek => {
                if config.monthly_week_of_month.is_none() {
                    return Err(recurrence_error("monthly weekday rule requires a week of month"));
                }
                if config.monthly_day_of_week.is_none() {
                    return Err(recurrence_error("monthly weekday rule requires a day of week"));
                }
            }
        }
    }
    Ok(())
}

pub fn validate_project_collection(projects: &[Project]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(projects.len());
    for project in projects {
        if !seen.insert(project.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                entity: "project",
                id: project.id.clone(),
            });
        }
        validate_project(project)?;
    }
    Ok(())
}

pub fn validate_phase_collection(phases: &[Phase], projects: &[Project]) -> Result<(), ValidationError> {
    let project_ids: HashSet<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(phases.len());
    for phase in phases {
        if !seen.insert(phase.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                entity: "phase",
                id: phase.id.clone(),
            });
        }
        if !project_ids.contains(phase.project_id.as_str()) {
            return Err(ValidationError::UnknownProject {
                id: phase.id.clone(),
                project_id: phase.project_id.clone(),
            });
        }
        validate_phase(phase)?;
    }
    Ok(())
}

/// Fixed-phase allocations of a project must fit inside its estimate.
/// Recurring phases are budgeted per occurrence and are not summed.
pub fn validate_phase_budget(project: &Project, phases: &[Phase]) -> Result<(), ValidationError> {
    let allocated: f64 = phases
        .iter()
        .filter(|phase| phase.project_id == project.id && !phase.is_recurring)
        .map(|phase| phase.time_allocation_hours)
        .sum();
    if allocated > project.estimated_hours + EPSILON {
        return Err(ValidationError::BudgetExceeded {
            id: project.id.clone(),
            allocated,
            estimated: project.estimated_hours,
        });
    }
    Ok(())
}
