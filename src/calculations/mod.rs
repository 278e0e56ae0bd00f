pub mod auto_estimate;
pub mod event_days;
pub mod recurrence;

pub use auto_estimate::DayEstimateAllocator;
pub use event_days::{DayHours, EventDayAggregator};
pub use recurrence::RecurringPatternExpander;
