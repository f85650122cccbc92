//! Background job scheduler
//!
//! Drives multi-step operations (leveling walk, filament change) one step
//! per session tick.

pub mod job;

pub use job::{FilamentMove, Job, JobKind, LevelingWalk, Scheduler, StepOutcome, LEVELING_POINTS};
