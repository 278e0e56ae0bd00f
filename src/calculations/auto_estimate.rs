use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::calculations::event_days::EventDayAggregator;
use crate::calculations::recurrence::RecurringPatternExpander;
use crate::calendar::{DayRange, WorkingDays};
use crate::config::EngineConfig;
use crate::estimate::{DayEstimate, EstimateSource, ProjectHoursSummary};
use crate::event::CalendarEvent;
use crate::project::{Phase, Project};

/// Turns a project's budget into per-day auto-estimates that fill the hours
/// real calendar events have not yet covered.
///
/// Every method is a pure function of the inputs held by the allocator, so
/// results can be recomputed (and memoised by the caller) freely.
pub struct DayEstimateAllocator<'a, C> {
    calendar: &'a C,
    events: &'a [CalendarEvent],
    config: &'a EngineConfig,
}

impl<'a, C> DayEstimateAllocator<'a, C>
where
    C: WorkingDays + Sync,
{
    pub fn new(calendar: &'a C, events: &'a [CalendarEvent], config: &'a EngineConfig) -> Self {
        Self {
            calendar,
            events,
            config,
        }
    }

    /// Inclusive window the project's budget is spread over, `None` when it is empty.
    pub fn project_window(
        &self,
        project: &Project,
        horizon_end: Option<NaiveDate>,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let horizon = match horizon_end {
            Some(horizon) => horizon,
            None => {
                let days = Days::new(u64::from(self.config.continuous_horizon_days));
                let Some(horizon) = project.start_date.checked_add_days(days) else {
                    warn!(project = %project.id, "continuous horizon overflows the date range");
                    return None;
                };
                horizon
            }
        };
        let (start, end) = project.allocation_window(horizon);
        if start > end {
            warn!(project = %project.id, %start, %end, "project window is empty");
            return None;
        }
        Some((start, end))
    }

    /// Event rows plus auto-estimate rows for `project`, ordered by date.
    pub fn project_estimates(
        &self,
        project: &Project,
        phases: &[Phase],
        horizon_end: Option<NaiveDate>,
    ) -> Vec<DayEstimate> {
        let aggregator = EventDayAggregator::for_project(self.events, &project.id);
        let mut rows = aggregator.to_day_estimates();
        rows.extend(self.auto_estimates_with(&aggregator, project, phases, horizon_end));
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| source_rank(a.source).cmp(&source_rank(b.source)))
        });
        rows
    }

    /// Only the synthetic rows. Phases belonging to other projects are ignored;
    /// when the project has no phases its own estimate is distributed instead.
    pub fn auto_estimates(
        &self,
        project: &Project,
        phases: &[Phase],
        horizon_end: Option<NaiveDate>,
    ) -> Vec<DayEstimate> {
        let aggregator = EventDayAggregator::for_project(self.events, &project.id);
        self.auto_estimates_with(&aggregator, project, phases, horizon_end)
    }

    fn auto_estimates_with(
        &self,
        aggregator: &EventDayAggregator,
        project: &Project,
        phases: &[Phase],
        horizon_end: Option<NaiveDate>,
    ) -> Vec<DayEstimate> {
        let Some(window) = self.project_window(project, horizon_end) else {
            return Vec::new();
        };

        let own: Vec<&Phase> = phases
            .iter()
            .filter(|phase| phase.project_id == project.id)
            .collect();

        if own.is_empty() {
            return self.allocate_window(
                aggregator,
                &project.id,
                None,
                project.estimated_hours,
                window,
            );
        }

        own.par_iter()
            .map(|phase| self.phase_estimates(aggregator, &project.id, phase, window))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// The windows a phase allocates into, clipped to the project window.
    pub fn phase_windows(
        &self,
        phase: &Phase,
        project_window: (NaiveDate, NaiveDate),
    ) -> Vec<(NaiveDate, NaiveDate)> {
        let (project_start, project_end) = project_window;
        if phase.is_recurring {
            let Some(config) = phase.recurring_config.as_ref() else {
                warn!(phase = %phase.id, "recurring phase without a recurring config");
                return Vec::new();
            };
            return RecurringPatternExpander::new(
                config,
                phase.end_date,
                self.config.max_recurring_iterations,
            )
            .occurrence_windows(project_start, project_end);
        }

        let start = phase.start_date.unwrap_or(project_start).max(project_start);
        let end = phase.end_date.min(project_end);
        if start > end {
            debug!(phase = %phase.id, "phase window lies outside the project");
            return Vec::new();
        }
        vec![(start, end)]
    }

    fn phase_estimates(
        &self,
        aggregator: &EventDayAggregator,
        project_id: &str,
        phase: &Phase,
        project_window: (NaiveDate, NaiveDate),
    ) -> Vec<DayEstimate> {
        self.phase_windows(phase, project_window)
            .into_iter()
            .flat_map(|window| {
                self.allocate_window(
                    aggregator,
                    project_id,
                    Some(&phase.id),
                    phase.time_allocation_hours,
                    window,
                )
            })
            .collect()
    }

    /// Spread whatever `allocation` events have not consumed evenly over the
    /// window's working days that carry no committed time. A window whose
    /// events meet or exceed the allocation produces nothing at all.
    fn allocate_window(
        &self,
        aggregator: &EventDayAggregator,
        project_id: &str,
        phase_id: Option<&str>,
        allocation: f64,
        (start, end): (NaiveDate, NaiveDate),
    ) -> Vec<DayEstimate> {
        if !allocation.is_finite() || allocation <= 0.0 {
            trace!(project = project_id, phase = ?phase_id, allocation, "non-positive allocation");
            return Vec::new();
        }

        let consumed = aggregator.consumed_between(start, end);
        if consumed >= allocation {
            debug!(
                project = project_id,
                phase = ?phase_id,
                consumed,
                allocation,
                "allocation fully consumed by events"
            );
            return Vec::new();
        }

        let unblocked: Vec<NaiveDate> = DayRange::new(start, end)
            .filter(|date| {
                self.calendar.is_working_day(*date) && !aggregator.hours_on(*date).is_blocked()
            })
            .collect();
        if unblocked.is_empty() {
            debug!(project = project_id, phase = ?phase_id, %start, %end, "no unblocked working days");
            return Vec::new();
        }

        let remaining = allocation - consumed;
        let per_day = remaining / unblocked.len() as f64;
        debug!(
            project = project_id,
            phase = ?phase_id,
            remaining,
            days = unblocked.len(),
            per_day,
            "distributed remaining hours"
        );
        unblocked
            .into_iter()
            .map(|date| DayEstimate::auto_estimate(date, per_day, project_id, phase_id))
            .collect()
    }

    pub fn project_summary(
        &self,
        project: &Project,
        phases: &[Phase],
        today: NaiveDate,
        horizon_end: Option<NaiveDate>,
    ) -> ProjectHoursSummary {
        let aggregator = EventDayAggregator::for_project(self.events, &project.id);
        let auto: f64 = self
            .auto_estimates_with(&aggregator, project, phases, horizon_end)
            .iter()
            .map(|row| row.hours)
            .sum();
        let planned = aggregator.planned_total();
        let completed = aggregator.completed_total();
        let remaining_days = self
            .project_window(project, horizon_end)
            .map(|(_, end)| self.calendar.working_days_remaining(end, today))
            .unwrap_or(0);

        ProjectHoursSummary {
            project_id: project.id.clone(),
            estimated_hours: project.estimated_hours,
            planned_hours: planned,
            completed_hours: completed,
            auto_estimated_hours: auto,
            unallocated_hours: project.estimated_hours - planned - completed - auto,
            working_days_remaining: remaining_days,
        }
    }
}

fn source_rank(source: EstimateSource) -> u8 {
    match source {
        EstimateSource::Event => 0,
        EstimateSource::MilestoneAllocation => 1,
    }
}
