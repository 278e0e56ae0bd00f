use chrono::{Duration, NaiveDate};
use tracing::trace;

use super::DragAction;
use crate::estimate::{DayEstimate, committed_span};
use crate::project::Project;
use crate::settings::Holiday;

/// Inclusive `(start, end)` pair of a bar.
pub type Span = (NaiveDate, NaiveDate);

/// Rules a candidate position must satisfy while a bar is dragged.
pub trait DragConstraints {
    /// Return the closest valid position to `candidate`.
    fn constrain(&self, action: DragAction, original: Span, candidate: Span) -> Span;
}

/// Project bars: resizes stop at committed work, and bars on the same row keep
/// a minimum gap between each other.
#[derive(Debug, Clone)]
pub struct ProjectBarConstraints {
    committed: Option<Span>,
    neighbours: Vec<Span>,
    min_gap_days: u32,
}

impl ProjectBarConstraints {
    pub fn new(
        project: &Project,
        projects: &[Project],
        estimates: &[DayEstimate],
        min_gap_days: u32,
    ) -> Self {
        let neighbours = if project.row_id.is_empty() {
            Vec::new()
        } else {
            projects
                .iter()
                .filter(|other| other.id != project.id && other.row_id == project.row_id)
                .map(|other| (other.start_date, other.end_date))
                .collect()
        };
        Self {
            committed: committed_span(estimates, &project.id),
            neighbours,
            min_gap_days,
        }
    }

    pub fn committed_span(&self) -> Option<Span> {
        self.committed
    }

    /// Resizes may not pull an edge across committed work that the original
    /// bar covered. Edges already clear of that work are left alone.
    fn apply_bounds(
        &self,
        action: DragAction,
        (original_start, original_end): Span,
        (start, end): Span,
    ) -> Span {
        let Some((earliest, latest)) = self.committed else {
            return (start, end);
        };
        match action {
            DragAction::ResizeStartDate if original_start <= earliest && start > earliest => {
                trace!(%start, %earliest, "start clamped to first committed day");
                (earliest, end)
            }
            DragAction::ResizeEndDate if original_end >= latest && end < latest => {
                trace!(%end, %latest, "end clamped to last committed day");
                (start, latest)
            }
            _ => (start, end),
        }
    }
}

impl DragConstraints for ProjectBarConstraints {
    fn constrain(&self, action: DragAction, original: Span, candidate: Span) -> Span {
        let bounded = self.apply_bounds(action, original, candidate);
        resolve_collision(action, original, bounded, &self.neighbours, self.min_gap_days)
    }
}

/// Holiday bars have no rows and no committed work; they only must not
/// overlap (or come closer than the gap to) any other holiday.
#[derive(Debug, Clone)]
pub struct HolidayBarConstraints {
    neighbours: Vec<Span>,
    min_gap_days: u32,
}

impl HolidayBarConstraints {
    pub fn new(holiday_id: &str, holidays: &[Holiday], min_gap_days: u32) -> Self {
        Self {
            neighbours: holidays
                .iter()
                .filter(|other| other.id != holiday_id)
                .map(|other| (other.start_date, other.end_date))
                .collect(),
            min_gap_days,
        }
    }
}

impl DragConstraints for HolidayBarConstraints {
    fn constrain(&self, action: DragAction, original: Span, candidate: Span) -> Span {
        resolve_collision(action, original, candidate, &self.neighbours, self.min_gap_days)
    }
}

/// Snap `candidate` so it keeps `gap_days` empty days to the nearest
/// neighbour in the direction of movement. Neighbours are classified by the
/// bar's original position; ones already overlapping it are ignored.
pub fn resolve_collision(
    action: DragAction,
    (original_start, original_end): Span,
    (mut start, mut end): Span,
    neighbours: &[Span],
    gap_days: u32,
) -> Span {
    let reach = Duration::days(i64::from(gap_days) + 1);
    let left_edge = neighbours
        .iter()
        .filter(|(_, n_end)| *n_end < original_start)
        .map(|(_, n_end)| *n_end)
        .max();
    let right_edge = neighbours
        .iter()
        .filter(|(n_start, _)| *n_start > original_end)
        .map(|(n_start, _)| *n_start)
        .min();

    match action {
        DragAction::ResizeStartDate => {
            if let Some(left_end) = left_edge {
                let limit = left_end + reach;
                if start < limit {
                    trace!(%start, %limit, "start snapped right of neighbour");
                    start = limit.min(end);
                }
            }
        }
        DragAction::ResizeEndDate => {
            if let Some(right_start) = right_edge {
                let limit = right_start - reach;
                if end > limit {
                    trace!(%end, %limit, "end snapped left of neighbour");
                    end = limit.max(start);
                }
            }
        }
        DragAction::Move => {
            if start > original_start {
                if let Some(right_start) = right_edge {
                    let limit = right_start - reach;
                    if end > limit {
                        let shift = limit - end;
                        start += shift;
                        end += shift;
                    }
                }
            } else if start < original_start {
                if let Some(left_end) = left_edge {
                    let limit = left_end + reach;
                    if start < limit {
                        let shift = limit - start;
                        start += shift;
                        end += shift;
                    }
                }
            }
        }
    }
    (start, end)
}
