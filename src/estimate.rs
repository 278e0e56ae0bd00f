use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimateSource {
    Event,
    MilestoneAllocation,
}

impl EstimateSource {
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateSource::Event => "event",
            EstimateSource::MilestoneAllocation => "milestone-allocation",
        }
    }
}

/// Hours attributed to one project on one day. Derived on every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEstimate {
    pub date: NaiveDate,
    pub hours: f64,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    pub source: EstimateSource,
    #[serde(default)]
    pub is_planned_event: bool,
    #[serde(default)]
    pub is_completed_event: bool,
}

impl DayEstimate {
    pub fn auto_estimate(
        date: NaiveDate,
        hours: f64,
        project_id: &str,
        phase_id: Option<&str>,
    ) -> Self {
        Self {
            date,
            hours,
            project_id: project_id.to_owned(),
            phase_id: phase_id.map(ToOwned::to_owned),
            source: EstimateSource::MilestoneAllocation,
            is_planned_event: false,
            is_completed_event: false,
        }
    }

    pub fn is_auto_estimate(&self) -> bool {
        self.source == EstimateSource::MilestoneAllocation
    }

    /// Real work is on this day, either scheduled or already done.
    pub fn is_committed(&self) -> bool {
        self.is_planned_event || self.is_completed_event
    }
}

/// Earliest and latest committed days among `estimates` for a project.
pub fn committed_span(estimates: &[DayEstimate], project_id: &str) -> Option<(NaiveDate, NaiveDate)> {
    estimates
        .iter()
        .filter(|e| e.project_id == project_id && e.is_committed())
        .fold(None, |span, e| match span {
            None => Some((e.date, e.date)),
            Some((lo, hi)) => Some((lo.min(e.date), hi.max(e.date))),
        })
}

/// Hour totals for a single project, as shown next to its timeline bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectHoursSummary {
    pub project_id: String,
    pub estimated_hours: f64,
    pub planned_hours: f64,
    pub completed_hours: f64,
    pub auto_estimated_hours: f64,
    /// Budget not yet covered by events or auto-estimates; negative when overrun.
    pub unallocated_hours: f64,
    pub working_days_remaining: u32,
}

impl ProjectHoursSummary {
    pub fn to_cli_summary(&self) -> String {
        format!(
            "Project {}: estimated {:.2}h, planned {:.2}h, completed {:.2}h, auto-estimated {:.2}h, unallocated {:.2}h, {} working day(s) remaining",
            self.project_id,
            self.estimated_hours,
            self.planned_hours,
            self.completed_hours,
            self.auto_estimated_hours,
            self.unallocated_hours,
            self.working_days_remaining,
        )
    }
}
