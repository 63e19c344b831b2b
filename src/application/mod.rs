//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The engine itself is synchronous; handlers move its work onto blocking
//! tasks so independent contexts are analyzed in parallel.

pub mod handlers;

pub use handlers::{
    AnalyzeContextsCommand, AnalyzeContextsHandler, CandidateSelection, RecommendActionsCommand,
    RecommendActionsHandler, RecommendActionsResult,
};
