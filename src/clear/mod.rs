//! Clearing the cache: the clear cycle and the startup decision.

pub mod decision;
pub mod orchestrator;

pub use decision::{
    evaluate, next_schedule, validated_threshold, AutoClear, AutoClearPlan, AutoClearReport,
    ClearReason,
};
pub use orchestrator::{ClearOrchestrator, ClearOutcome, ClearTrigger};
