pub mod budget;
pub mod calculations;
pub mod calendar;
pub mod calendar_cache;
pub mod config;
pub mod drag;
pub mod estimate;
pub mod event;
pub mod persistence;
pub mod project;
pub mod settings;
pub mod validation;
pub mod workspace;

pub use budget::{BudgetEditError, apply_phase_allocation_edit};
pub use calculations::{DayEstimateAllocator, DayHours, EventDayAggregator, RecurringPatternExpander};
pub use calendar::{WorkingDayCalendar, WorkingDays, WorkingDaysSummary};
pub use calendar_cache::{CacheStats, CachedCalendar, WorkingDayCache};
pub use config::{ConfigError, EngineConfig};
pub use drag::{
    DragAction, DragConstraints, DragController, DragError, DragOutcome, DragState, GesturePhase,
    HolidayBarConstraints, ProjectBarConstraints, UpdateCoalescer,
};
pub use estimate::{DayEstimate, EstimateSource, ProjectHoursSummary};
pub use event::{CalendarEvent, EventType};
pub use persistence::{
    CommitError, EntityKind, EntityUpdate, EntityUpdater, PersistenceError, PersistenceResult,
    load_estimates_from_csv, load_workspace_from_json, save_estimates_to_csv,
    save_estimates_to_json, save_workspace_to_json,
};
pub use project::{MonthlyPattern, Phase, Project, RecurringConfig, RecurringType, WeekOfMonth};
pub use settings::{Holiday, WorkSlot, WorkingDaySettings};
pub use validation::ValidationError;
pub use workspace::{Workspace, WorkspaceError};
