use super::{PersistenceError, PersistenceResult};
use crate::config::EngineConfig;
use crate::estimate::{DayEstimate, EstimateSource};
use crate::event::CalendarEvent;
use crate::project::{Phase, Project};
use crate::settings::{Holiday, WorkingDaySettings};
use crate::workspace::Workspace;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct WorkspaceSnapshot {
    #[serde(default = "WorkingDaySettings::standard_week")]
    settings: WorkingDaySettings,
    #[serde(default)]
    holidays: Vec<Holiday>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    phases: Vec<Phase>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
    #[serde(default)]
    config: EngineConfig,
}

impl WorkspaceSnapshot {
    fn from_workspace(workspace: &Workspace) -> PersistenceResult<Self> {
        workspace.validate()?;
        Ok(Self {
            settings: workspace.settings.clone(),
            holidays: workspace.holidays.clone(),
            projects: workspace.projects.clone(),
            phases: workspace.phases.clone(),
            events: workspace.events.clone(),
            config: workspace.config.clone(),
        })
    }

    fn into_workspace(self) -> PersistenceResult<Workspace> {
        self.config
            .validate()
            .map_err(|err| PersistenceError::Malformed(err.to_string()))?;
        let workspace = Workspace {
            settings: self.settings,
            holidays: self.holidays,
            projects: self.projects,
            phases: self.phases,
            events: self.events,
            config: self.config,
        };
        workspace.validate()?;
        Ok(workspace)
    }
}

pub fn save_workspace_to_json<P: AsRef<Path>>(
    workspace: &Workspace,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = WorkspaceSnapshot::from_workspace(workspace)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_workspace_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Workspace> {
    let file = File::open(path)?;
    let snapshot: WorkspaceSnapshot = serde_json::from_reader(file)?;
    let workspace = snapshot.into_workspace()?;
    debug!(
        projects = workspace.projects.len(),
        phases = workspace.phases.len(),
        events = workspace.events.len(),
        holidays = workspace.holidays.len(),
        "workspace loaded"
    );
    Ok(workspace)
}

pub fn save_estimates_to_json<P: AsRef<Path>>(
    estimates: &[DayEstimate],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, estimates)?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct EstimateCsvRecord {
    date: String,
    project_id: String,
    phase_id: String,
    hours: f64,
    source: String,
    is_planned_event: bool,
    is_completed_event: bool,
}

impl From<&DayEstimate> for EstimateCsvRecord {
    fn from(estimate: &DayEstimate) -> Self {
        Self {
            date: estimate.date.format("%Y-%m-%d").to_string(),
            project_id: estimate.project_id.clone(),
            phase_id: estimate.phase_id.clone().unwrap_or_default(),
            hours: estimate.hours,
            source: estimate.source.as_str().to_string(),
            is_planned_event: estimate.is_planned_event,
            is_completed_event: estimate.is_completed_event,
        }
    }
}

impl EstimateCsvRecord {
    fn into_estimate(self) -> PersistenceResult<DayEstimate> {
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(PersistenceError::Malformed(format!(
                "invalid hours {} on {}",
                self.hours, self.date
            )));
        }
        Ok(DayEstimate {
            date: parse_date(&self.date)?,
            hours: self.hours,
            project_id: self.project_id,
            phase_id: parse_string_option(self.phase_id),
            source: parse_source(&self.source)?,
            is_planned_event: self.is_planned_event,
            is_completed_event: self.is_completed_event,
        })
    }
}

pub fn save_estimates_to_csv<P: AsRef<Path>>(
    estimates: &[DayEstimate],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for estimate in estimates {
        writer.serialize(EstimateCsvRecord::from(estimate))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_estimates_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<DayEstimate>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut estimates = Vec::new();
    for record in reader.deserialize::<EstimateCsvRecord>() {
        estimates.push(record?.into_estimate()?);
    }
    Ok(estimates)
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::Malformed(format!("invalid date '{input}': {e}")))
}

fn parse_source(input: &str) -> PersistenceResult<EstimateSource> {
    match input.trim() {
        "event" => Ok(EstimateSource::Event),
        "milestone-allocation" => Ok(EstimateSource::MilestoneAllocation),
        other => Err(PersistenceError::Malformed(format!(
            "invalid estimate source '{other}'"
        ))),
    }
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
