//! Analysis handlers - orchestrate the engine between ports.

mod analyze_contexts;
mod context_fan_out;
mod recommend_actions;

pub use analyze_contexts::{AnalyzeContextsCommand, AnalyzeContextsHandler};
pub use recommend_actions::{
    CandidateSelection, RecommendActionsCommand, RecommendActionsHandler, RecommendActionsResult,
};
