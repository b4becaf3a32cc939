//! vocaplan-core — forgetting-curve schedules and plan files.
//!
//! This crate defines the curriculum model, the schedule generator and
//! projector, the plan-file artifacts, and the vocabulary-source trait that
//! the rest of vocaplan builds on.

pub mod engine;
pub mod error;
pub mod generator;
pub mod model;
pub mod plan;
pub mod projector;
pub mod report;
pub mod schedule;
pub mod traits;

pub use error::{ScheduleError, SourceError};
pub use generator::{generate, generate_from_str, parse_date};
pub use model::{Curriculum, DueUnit, UnitKey, Word};
pub use projector::{due_on, project, resequence_by_date, DateIndexedSchedule, DatePlan};
pub use schedule::Schedule;
