use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] ValidationError),
    #[error("malformed record: {0}")]
    Malformed(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Phase,
    Holiday,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Phase => "phase",
            EntityKind::Holiday => "holiday",
        };
        f.write_str(name)
    }
}

/// Partial update for a single entity. Unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdate {
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_allocation_hours: Option<f64>,
}

impl EntityUpdate {
    pub fn dates(kind: EntityKind, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            kind,
            start_date: Some(start_date),
            end_date: Some(end_date),
            time_allocation_hours: None,
        }
    }

    pub fn allocation(hours: f64) -> Self {
        Self {
            kind: EntityKind::Phase,
            start_date: None,
            end_date: None,
            time_allocation_hours: Some(hours),
        }
    }
}

/// Write side of the data-access layer. The engine calls it at most once per
/// completed user action.
pub trait EntityUpdater {
    type Error: fmt::Display;

    fn update_entity(&mut self, id: &str, update: EntityUpdate) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to persist {kind} {id}: {message}")]
pub struct CommitError {
    pub kind: EntityKind,
    pub id: String,
    pub message: String,
}

/// Forward one update and turn the updater's error into a [`CommitError`].
pub fn commit_update<U: EntityUpdater>(
    updater: &mut U,
    id: &str,
    update: EntityUpdate,
) -> Result<(), CommitError> {
    let kind = update.kind;
    updater
        .update_entity(id, update)
        .map_err(|err| CommitError {
            kind,
            id: id.to_owned(),
            message: err.to_string(),
        })
}

pub mod file;

pub use file::{
    load_estimates_from_csv, load_workspace_from_json, save_estimates_to_csv,
    save_estimates_to_json, save_workspace_to_json,
};
