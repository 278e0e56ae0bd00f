use thiserror::Error;
use tracing::{debug, info};

use crate::persistence::{CommitError, EntityUpdate, EntityUpdater, commit_update};
use crate::project::{Phase, Project};
use crate::validation::{ValidationError, validate_phase, validate_phase_budget};

#[derive(Debug, Error)]
pub enum BudgetEditError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// Change a phase's hour allocation.
///
/// The edit is checked against the phase rules and the project's budget before
/// anything is written; an accepted edit results in exactly one
/// `update_entity` call, a rejected or unchanged one in none.
pub fn apply_phase_allocation_edit<U: EntityUpdater>(
    project: &Project,
    phases: &[Phase],
    phase_id: &str,
    new_hours: f64,
    updater: &mut U,
) -> Result<Phase, BudgetEditError> {
    let current = phases
        .iter()
        .find(|phase| phase.id == phase_id && phase.project_id == project.id)
        .ok_or_else(|| ValidationError::UnknownPhase(phase_id.to_owned()))?;

    let mut edited = current.clone();
    edited.time_allocation_hours = new_hours;
    validate_phase(&edited)?;

    let candidate: Vec<Phase> = phases
        .iter()
        .map(|phase| {
            if phase.id == phase_id {
                edited.clone()
            } else {
                phase.clone()
            }
        })
        .collect();
    validate_phase_budget(project, &candidate)?;

    if current.time_allocation_hours == new_hours {
        debug!(phase = phase_id, "allocation unchanged, nothing to persist");
        return Ok(edited);
    }

    commit_update(updater, phase_id, EntityUpdate::allocation(new_hours))?;
    info!(phase = phase_id, hours = new_hours, "phase allocation updated");
    Ok(edited)
}
