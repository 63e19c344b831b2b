//! Application handlers.
//!
//! Command handlers that load records through ports, run the pure analysis
//! services and publish the results.

pub mod analysis;

pub use analysis::{
    AnalyzeContextsCommand, AnalyzeContextsHandler, CandidateSelection, RecommendActionsCommand,
    RecommendActionsHandler, RecommendActionsResult,
};
