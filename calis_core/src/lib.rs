#![forbid(unsafe_code)]

//! Core domain model and business logic for the Calispro progression system.
//!
//! This crate provides:
//! - Domain types (exercises, sessions, plans, readiness)
//! - Catalog management and validation
//! - Mastery, unlock, and skill-stage evaluation
//! - Readiness scoring
//! - Workout generation
//! - Persistence (JSONL stores, config)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod equipment;
pub mod history;
pub mod store;
pub mod mastery;
pub mod unlock;
pub mod skill;
pub mod readiness;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use engine::{generate, GenerationRequest};
pub use history::build_history;
pub use mastery::{is_mastered, mastered_set};
pub use readiness::score as readiness_score;
pub use skill::{current_stage, skills};
pub use store::{DataStore, WorkoutSink};
pub use unlock::{find_unlock_keys, is_unlocked};
