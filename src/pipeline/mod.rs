//! Fetch, fall back, normalize, rank.
//!
//! `plan` decides what to try, `orchestrator` tries it, `ranker` shapes the
//! winning entity list for the caller.

pub mod orchestrator;
pub mod plan;
pub mod ranker;

pub use orchestrator::{AttemptFailure, FallbackOutcome, FallbackState, Orchestrator};
pub use plan::{Attempt, AttemptPlan, DateWindow, Endpoints};
