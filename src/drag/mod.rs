//! Interactive move/resize gestures on timeline bars.
//!
//! A [`DragController`] owns at most one gesture at a time. Pointer moves only
//! touch in-memory state; persistence is reached once, on release, and only
//! when the bar actually moved.

use std::time::{Duration, Instant};

use chrono::{Duration as Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::persistence::{CommitError, EntityKind, EntityUpdate, EntityUpdater, commit_update};

pub mod constraints;
pub mod throttle;

pub use constraints::{
    DragConstraints, HolidayBarConstraints, ProjectBarConstraints, Span, resolve_collision,
};
pub use throttle::UpdateCoalescer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragAction {
    Move,
    ResizeStartDate,
    ResizeEndDate,
}

impl std::str::FromStr for DragAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(DragAction::Move),
            "start" | "resize-start-date" => Ok(DragAction::ResizeStartDate),
            "end" | "resize-end-date" => Ok(DragAction::ResizeEndDate),
            other => Err(format!("unknown drag action '{other}'")),
        }
    }
}

/// Snapshot of an in-flight gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    pub entity_id: String,
    pub kind: EntityKind,
    pub action: DragAction,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub candidate_start: NaiveDate,
    pub candidate_end: NaiveDate,
    pub last_days_delta: i64,
}

impl DragState {
    pub fn original(&self) -> Span {
        (self.original_start, self.original_end)
    }

    pub fn candidate(&self) -> Span {
        (self.candidate_start, self.candidate_end)
    }

    pub fn is_displaced(&self) -> bool {
        self.candidate() != self.original()
    }

    /// Raw position for a pointer offset of `days`, before any constraint.
    /// `None` when the offset leaves the representable date range.
    fn unconstrained(&self, days: i64) -> Option<Span> {
        let delta = Days::try_days(days)?;
        let (start, end) = self.original();
        let span = match self.action {
            DragAction::Move => (
                start.checked_add_signed(delta)?,
                end.checked_add_signed(delta)?,
            ),
            DragAction::ResizeStartDate => (start.checked_add_signed(delta)?.min(end), end),
            DragAction::ResizeEndDate => (start, end.checked_add_signed(delta)?.max(start)),
        };
        Some(span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("a gesture on {0} is already in progress")]
    GestureInProgress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was active.
    Idle,
    /// Released where it started; nothing was written.
    Unchanged(DragState),
    /// Released at a new position, persisted with one update.
    Committed(DragState),
}

#[derive(Debug)]
pub struct DragController {
    active: Option<DragState>,
    visual: UpdateCoalescer<DragState>,
}

impl DragController {
    pub fn new(flush_interval: Duration) -> Self {
        Self {
            active: None,
            visual: UpdateCoalescer::new(flush_interval),
        }
    }

    pub fn phase(&self) -> GesturePhase {
        if self.active.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    pub fn state(&self) -> Option<&DragState> {
        self.active.as_ref()
    }

    /// Pointer-down on a bar edge or body.
    pub fn begin(
        &mut self,
        entity_id: &str,
        kind: EntityKind,
        action: DragAction,
        (start, end): Span,
    ) -> Result<(), DragError> {
        if let Some(active) = &self.active {
            return Err(DragError::GestureInProgress(active.entity_id.clone()));
        }
        debug!(entity = entity_id, ?action, %start, %end, "gesture started");
        self.visual.reset();
        self.active = Some(DragState {
            entity_id: entity_id.to_owned(),
            kind,
            action,
            original_start: start,
            original_end: end,
            candidate_start: start,
            candidate_end: end,
            last_days_delta: 0,
        });
        Ok(())
    }

    /// Pointer-move with the total day offset since pointer-down. Updates the
    /// candidate and returns a state for the renderer when the coalescing
    /// window allows one.
    pub fn pointer_move<C: DragConstraints>(
        &mut self,
        days_delta: i64,
        constraints: &C,
        now: Instant,
    ) -> Option<DragState> {
        let state = self.active.as_mut()?;
        let Some(candidate) = state.unconstrained(days_delta) else {
            warn!(
                entity = %state.entity_id,
                days_delta,
                "pointer offset out of range, keeping last position"
            );
            return None;
        };
        let (start, end) = constraints.constrain(state.action, state.original(), candidate);
        state.candidate_start = start;
        state.candidate_end = end;
        state.last_days_delta = days_delta;
        let snapshot = state.clone();
        self.visual.push(snapshot, now)
    }

    /// Timer tick: emit a coalesced visual update if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<DragState> {
        self.active.as_ref()?;
        self.visual.poll(now)
    }

    /// Pointer-cancel: drop everything without writing.
    pub fn cancel(&mut self) -> Option<DragState> {
        self.visual.reset();
        let discarded = self.active.take();
        if let Some(state) = &discarded {
            debug!(entity = %state.entity_id, "gesture cancelled");
        }
        discarded
    }

    /// Pointer-up: write the final position once if it differs from the
    /// original. The gesture is over afterwards whether the write succeeds or not.
    pub fn release<U: EntityUpdater>(&mut self, updater: &mut U) -> Result<DragOutcome, CommitError> {
        self.visual.reset();
        let Some(state) = self.active.take() else {
            return Ok(DragOutcome::Idle);
        };
        if !state.is_displaced() {
            debug!(entity = %state.entity_id, "gesture released without displacement");
            return Ok(DragOutcome::Unchanged(state));
        }

        let update = EntityUpdate::dates(state.kind, state.candidate_start, state.candidate_end);
        commit_update(updater, &state.entity_id, update)?;
        info!(
            entity = %state.entity_id,
            start = %state.candidate_start,
            end = %state.candidate_end,
            "gesture committed"
        );
        Ok(DragOutcome::Committed(state))
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
