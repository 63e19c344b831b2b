//! Role Classifier - rule-based sentence role detection.
//!
//! Assigns a role to a free-text sentence using fixed keyword patterns. No
//! statistical inference: the first role (in [`SentenceRole::ordered`] order)
//! with a matching pattern wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::RecordKind;

/// Role of a sentence inside a decision narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceRole {
    Cause,
    Action,
    Outcome,
    Constraint,
    Problem,
    Observation,
}

impl SentenceRole {
    /// Roles in rule-evaluation priority order. `Observation` is the fallback
    /// and has no rules.
    pub fn ordered() -> &'static [SentenceRole] {
        &[
            SentenceRole::Cause,
            SentenceRole::Action,
            SentenceRole::Outcome,
            SentenceRole::Constraint,
            SentenceRole::Problem,
        ]
    }

    /// The record kind this role produces, if any.
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            SentenceRole::Cause => Some(RecordKind::Cause),
            SentenceRole::Action => Some(RecordKind::Action),
            SentenceRole::Outcome => Some(RecordKind::Outcome),
            SentenceRole::Constraint | SentenceRole::Problem | SentenceRole::Observation => None,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            SentenceRole::Cause => &[
                r"\bbecause\b",
                r"\bdue to\b",
                r"\bas a result of\b",
                r"\broot cause\b",
            ],
            SentenceRole::Action => &[
                r"\brestart(ed)?\b",
                r"\brollback\b",
                r"\bfix(ed)?\b",
                r"\bpatch(ed)?\b",
                r"\bupdate(d)?\b",
                r"\bdisable(d)?\b",
                r"\bretry\b",
            ],
            SentenceRole::Outcome => &[
                r"\bresolved\b",
                r"\brecovered\b",
                r"\bstable\b",
                r"\bsuccessfully\b",
                r"\bfixed\b",
            ],
            SentenceRole::Constraint => &[
                r"\bcannot\b",
                r"\blimitation\b",
                r"\brisk\b",
                r"\bnot possible\b",
                r"\btrade[- ]off\b",
            ],
            SentenceRole::Problem => &[
                r"\berror\b",
                r"\bfailure\b",
                r"\btimeout\b",
                r"\bincident\b",
                r"\bunavailable\b",
                r"\bdegraded\b",
                r"\bunallocated\b",
            ],
            SentenceRole::Observation => &[],
        }
    }
}

type Rules = Vec<(SentenceRole, Vec<Regex>)>;

static RULES: Lazy<Result<Rules, regex::Error>> = Lazy::new(compile_rules);

fn compile_rules() -> Result<Rules, regex::Error> {
    SentenceRole::ordered()
        .iter()
        .map(|role| {
            let compiled = role
                .patterns()
                .iter()
                .map(|p| Regex::new(&format!("(?i){}", p)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((*role, compiled))
        })
        .collect()
}

/// Rule-based sentence classifier.
pub struct RoleClassifier;

impl RoleClassifier {
    /// Classifies a sentence.
    ///
    /// # Errors
    /// Returns the compile error of the first invalid pattern.
    ///
    /// # Edge Cases
    /// - Blank input: `Observation`
    /// - Several roles match: the earliest in priority order wins
    pub fn classify(sentence: &str) -> Result<SentenceRole, regex::Error> {
        let rules = RULES.as_ref().map_err(Clone::clone)?;

        let trimmed = sentence.trim();
        if trimmed.is_empty() {
            return Ok(SentenceRole::Observation);
        }

        Ok(rules
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(trimmed)))
            .map(|(role, _)| *role)
            .unwrap_or(SentenceRole::Observation))
    }
}
