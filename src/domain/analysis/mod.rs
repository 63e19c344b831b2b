//! Analysis Module - Pure domain services for decision graph analysis.
//!
//! This module contains stateless functions that turn a record snapshot into
//! causal chains, coverage and debt metrics, maturity rankings and action
//! recommendations.
//!
//! # Components
//!
//! - `ChainBuilder` - Link validation, cycle detection, chain assembly
//! - `CoverageAnalyzer` - Coverage ratios, completeness distribution, debt
//! - `MaturityComparator` - Cross-context composite ranking
//! - `RecommendationEngine` - Weighted scorecards for candidate actions
//! - `SignalAnalyzer` - Issue and fix vocabulary mined from descriptions
//!
//! # Design Philosophy
//!
//! All functions are pure (no side effects) and deterministic over an
//! immutable snapshot. No ports, no logging, no clock: the same input always
//! yields byte-identical output.

mod causal_chain;
mod chain_builder;
mod coverage_analyzer;
mod debt;
mod errors;
mod maturity_comparator;
mod recommendation_engine;
mod scorecard;
mod settings;
mod signal_analyzer;

// Re-export all public types
pub use causal_chain::{CausalChain, Completeness};
pub use chain_builder::ChainBuilder;
pub use coverage_analyzer::{
    CompletenessDistribution, ContextMetrics, CoverageAnalyzer, CoverageMetric,
};
pub use debt::{
    DebtScore, DebtWeights, DEFAULT_ACTION_ONLY_WEIGHT, DEFAULT_CAUSE_ONLY_WEIGHT,
    DEFAULT_ORPHAN_WEIGHT,
};
pub use errors::{AnalysisError, LinkFault};
pub use maturity_comparator::{MaturityComparator, MaturityRank};
pub use recommendation_engine::{RecommendationEngine, RecommendationInput};
pub use scorecard::{Evidence, RecommendationSummary, Scorecard, Signal, SubScores, MAX_ALTERNATIVES};
pub use settings::{EngineSettings, RecommendationWeights, SimilarityMetric, SupportPolicy};
pub use signal_analyzer::{
    ContextSignals, SignalAnalyzer, TermCount, FIX_TERMS, ISSUE_TERMS, STOPWORDS, TOP_TERMS_LIMIT,
};
