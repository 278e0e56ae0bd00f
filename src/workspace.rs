use chrono::NaiveDate;
use thiserror::Error;

use crate::calculations::{DayEstimateAllocator, RecurringPatternExpander};
use crate::calendar::{WorkingDayCalendar, WorkingDays, WorkingDaysSummary};
use crate::calendar_cache::{CachedCalendar, WorkingDayCache};
use crate::config::EngineConfig;
use crate::drag::{DragAction, DragController, DragError, HolidayBarConstraints, ProjectBarConstraints};
use crate::estimate::{DayEstimate, ProjectHoursSummary};
use crate::event::CalendarEvent;
use crate::persistence::{EntityKind, EntityUpdate, EntityUpdater};
use crate::project::{Phase, Project};
use crate::settings::{Holiday, WorkingDaySettings};
use crate::validation::{
    ValidationError, validate_holiday_collection, validate_phase_collection,
    validate_project_collection, validate_settings,
};

/// Everything the engine reads: entities from the data-access layer plus the
/// engine configuration.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub settings: WorkingDaySettings,
    pub holidays: Vec<Holiday>,
    pub projects: Vec<Project>,
    pub phases: Vec<Phase>,
    pub events: Vec<CalendarEvent>,
    pub config: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("unknown project {0}")]
    UnknownProject(String),
    #[error("unknown phase {0}")]
    UnknownPhase(String),
    #[error("unknown holiday {0}")]
    UnknownHoliday(String),
    #[error(transparent)]
    Drag(#[from] DragError),
}

impl Workspace {
    pub fn new(settings: WorkingDaySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_settings(&self.settings)?;
        validate_holiday_collection(&self.holidays)?;
        validate_project_collection(&self.projects)?;
        validate_phase_collection(&self.phases, &self.projects)
    }

    pub fn calendar(&self) -> WorkingDayCalendar<'_> {
        WorkingDayCalendar::new(&self.settings, &self.holidays)
    }

    /// Empty cache sized from the engine configuration.
    pub fn working_day_cache(&self) -> WorkingDayCache {
        WorkingDayCache::new(self.config.cache_capacity)
    }

    pub fn cached_calendar<'a>(&'a self, cache: &'a WorkingDayCache) -> CachedCalendar<'a> {
        CachedCalendar::new(&self.settings, &self.holidays, cache)
    }

    pub fn project(&self, project_id: &str) -> Result<&Project, WorkspaceError> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| WorkspaceError::UnknownProject(project_id.to_owned()))
    }

    pub fn phase(&self, phase_id: &str) -> Result<&Phase, WorkspaceError> {
        self.phases
            .iter()
            .find(|p| p.id == phase_id)
            .ok_or_else(|| WorkspaceError::UnknownPhase(phase_id.to_owned()))
    }

    pub fn project_phases(&self, project_id: &str) -> Vec<Phase> {
        self.phases
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect()
    }

    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> WorkingDaysSummary {
        self.calendar().working_days_between(start, end)
    }

    pub fn working_days_remaining(&self, end: NaiveDate, today: NaiveDate) -> u32 {
        self.calendar().working_days_remaining(end, today)
    }

    pub fn project_estimates(
        &self,
        project_id: &str,
        horizon_end: Option<NaiveDate>,
    ) -> Result<Vec<DayEstimate>, WorkspaceError> {
        let project = self.project(project_id)?;
        let calendar = self.calendar();
        let allocator = DayEstimateAllocator::new(&calendar, &self.events, &self.config);
        Ok(allocator.project_estimates(project, &self.phases, horizon_end))
    }

    /// Same rows as [`Workspace::project_estimates`], answering working-day
    /// questions through `cache`.
    pub fn project_estimates_cached(
        &self,
        project_id: &str,
        horizon_end: Option<NaiveDate>,
        cache: &WorkingDayCache,
    ) -> Result<Vec<DayEstimate>, WorkspaceError> {
        let project = self.project(project_id)?;
        let calendar = self.cached_calendar(cache);
        let allocator = DayEstimateAllocator::new(&calendar, &self.events, &self.config);
        Ok(allocator.project_estimates(project, &self.phases, horizon_end))
    }

    pub fn project_summary(
        &self,
        project_id: &str,
        today: NaiveDate,
        horizon_end: Option<NaiveDate>,
    ) -> Result<ProjectHoursSummary, WorkspaceError> {
        let project = self.project(project_id)?;
        let calendar = self.calendar();
        let allocator = DayEstimateAllocator::new(&calendar, &self.events, &self.config);
        Ok(allocator.project_summary(project, &self.phases, today, horizon_end))
    }

    /// Occurrence dates of a recurring phase inside its project's window.
    pub fn phase_occurrences(
        &self,
        phase_id: &str,
        horizon_end: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>, WorkspaceError> {
        let phase = self.phase(phase_id)?;
        let project = self.project(&phase.project_id)?;
        let calendar = self.calendar();
        let allocator = DayEstimateAllocator::new(&calendar, &self.events, &self.config);
        let Some((start, end)) = allocator.project_window(project, horizon_end) else {
            return Ok(Vec::new());
        };
        Ok(match phase.recurrence() {
            Some(config) => RecurringPatternExpander::new(
                config,
                phase.end_date,
                self.config.max_recurring_iterations,
            )
            .occurrences(start, end),
            None => Vec::new(),
        })
    }

    pub fn drag_controller(&self) -> DragController {
        DragController::new(self.config.flush_interval())
    }

    /// Start a gesture on a project bar and build the constraints it is
    /// checked against.
    pub fn begin_project_drag(
        &self,
        controller: &mut DragController,
        project_id: &str,
        action: DragAction,
        horizon_end: Option<NaiveDate>,
    ) -> Result<ProjectBarConstraints, WorkspaceError> {
        let project = self.project(project_id)?;
        let estimates = self.project_estimates(project_id, horizon_end)?;
        let constraints = ProjectBarConstraints::new(
            project,
            &self.projects,
            &estimates,
            self.config.min_gap_days,
        );
        controller.begin(
            project_id,
            EntityKind::Project,
            action,
            (project.start_date, project.end_date),
        )?;
        Ok(constraints)
    }

    pub fn begin_holiday_drag(
        &self,
        controller: &mut DragController,
        holiday_id: &str,
        action: DragAction,
    ) -> Result<HolidayBarConstraints, WorkspaceError> {
        let holiday = self
            .holidays
            .iter()
            .find(|h| h.id == holiday_id)
            .ok_or_else(|| WorkspaceError::UnknownHoliday(holiday_id.to_owned()))?;
        let constraints =
            HolidayBarConstraints::new(holiday_id, &self.holidays, self.config.holiday_min_gap_days);
        controller.begin(
            holiday_id,
            EntityKind::Holiday,
            action,
            (holiday.start_date, holiday.end_date),
        )?;
        Ok(constraints)
    }
}

/// Applying updates to the in-memory entities lets a workspace stand in for
/// the data-access layer.
impl EntityUpdater for Workspace {
    type Error = WorkspaceError;

    fn update_entity(&mut self, id: &str, update: EntityUpdate) -> Result<(), Self::Error> {
        match update.kind {
            EntityKind::Project => {
                let project = self
                    .projects
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| WorkspaceError::UnknownProject(id.to_owned()))?;
                if let Some(start) = update.start_date {
                    project.start_date = start;
                }
                if let Some(end) = update.end_date {
                    project.end_date = end;
                }
            }
            EntityKind::Phase => {
                let phase = self
                    .phases
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| WorkspaceError::UnknownPhase(id.to_owned()))?;
                if let Some(start) = update.start_date {
                    phase.start_date = Some(start);
                }
                if let Some(end) = update.end_date {
                    phase.end_date = end;
                }
                if let Some(hours) = update.time_allocation_hours {
                    phase.time_allocation_hours = hours;
                }
            }
            EntityKind::Holiday => {
                let holiday = self
                    .holidays
                    .iter_mut()
                    .find(|h| h.id == id)
                    .ok_or_else(|| WorkspaceError::UnknownHoliday(id.to_owned()))?;
                if let Some(start) = update.start_date {
                    holiday.start_date = start;
                }
                if let Some(end) = update.end_date {
                    holiday.end_date = end;
                }
            }
        }
        Ok(())
    }
}
