//! Decision Debt - Causal chain analysis for decision records
//!
//! This crate reconstructs cause, action and outcome chains from a snapshot of
//! decision records, measures how completely each context closes its chains,
//! scores the resulting decision debt, ranks contexts by maturity and ranks
//! candidate actions for an open cause.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
