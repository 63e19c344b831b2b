//! Domain layer containing analysis logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, ratios, errors)
//! - `record` - Decision records, tags, snapshots and the role classifier
//! - `analysis` - Pure domain services (chains, coverage, debt, maturity, recommendations)

pub mod analysis;
pub mod foundation;
pub mod record;
