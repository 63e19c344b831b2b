//! Signal Analyzer - lexical signals mined from record descriptions.
//!
//! Counts how often a context writes about failures and about remedies,
//! which records name both, and how varied its vocabulary is. Purely
//! descriptive: nothing here feeds debt or maturity.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{ContextId, Ratio, RecordId};
use crate::domain::record::RecordSnapshot;

use super::AnalysisError;

/// Terms marking a failure or degradation. Sorted.
pub const ISSUE_TERMS: &[&str] = &[
    "authentication",
    "crash",
    "degraded",
    "error",
    "exception",
    "failed",
    "failure",
    "issue",
    "latency",
    "timeout",
    "unauthorized",
    "unavailable",
];

/// Terms marking a mitigation. Sorted.
pub const FIX_TERMS: &[&str] = &[
    "disable", "enable", "increase", "patch", "restart", "retry", "rollback", "scale", "update",
];

/// Words dropped before counting. Sorted.
pub const STOPWORDS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "been", "before", "being", "both", "but",
    "can", "did", "does", "due", "each", "for", "from", "had", "has", "have", "into", "its", "more",
    "most", "not", "only", "our", "out", "over", "per", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "under", "very", "via",
    "was", "were", "what", "when", "where", "which", "while", "who", "will", "with", "would",
];

/// Number of terms kept in [`ContextSignals::top_terms`].
pub const TOP_TERMS_LIMIT: usize = 10;

const TOKEN_PATTERN: &str = "[a-z]{3,}";

static TOKEN: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(TOKEN_PATTERN));

/// A term and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Lexical signals of one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSignals {
    pub context: ContextId,
    /// Records with a non-blank description.
    pub described: usize,
    pub issue_mentions: usize,
    pub fix_mentions: usize,
    /// `issue_mentions / described`.
    pub issue_density: Ratio,
    /// `fix_mentions / described`.
    pub fix_density: Ratio,
    /// Records whose description names a problem and a remedy, ascending id.
    pub issue_fix_pairs: Vec<RecordId>,
    pub total_tokens: usize,
    pub distinct_tokens: usize,
    /// `distinct_tokens / total_tokens`; richer wording scores higher.
    pub lexical_maturity: Ratio,
    /// Most frequent terms, count descending then term ascending.
    pub top_terms: Vec<TermCount>,
}

/// Description mining functions.
pub struct SignalAnalyzer;

impl SignalAnalyzer {
    /// Lowercased words of three or more ASCII letters, stopwords removed.
    pub fn tokenize(text: &str) -> Result<Vec<String>, AnalysisError> {
        let token = TOKEN
            .as_ref()
            .map_err(|e| AnalysisError::invalid_pattern(TOKEN_PATTERN, e))?;
        let lowered = text.to_lowercase();

        Ok(token
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| STOPWORDS.binary_search(w).is_err())
            .map(str::to_string)
            .collect())
    }

    /// Computes the signals of `context`.
    ///
    /// Terms match whole tokens only: "restarted" is not "restart".
    ///
    /// # Edge Cases
    /// - No described records: every count 0, every ratio 0
    pub fn analyze(
        snapshot: &RecordSnapshot,
        context: &ContextId,
    ) -> Result<ContextSignals, AnalysisError> {
        let mut described = 0;
        let mut issue_mentions = 0;
        let mut fix_mentions = 0;
        let mut issue_fix_pairs = Vec::new();
        let mut total_tokens = 0;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();

        for record in snapshot.in_context(context) {
            if record.description.trim().is_empty() {
                continue;
            }
            described += 1;

            let tokens = Self::tokenize(&record.description)?;
            let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            let issue = distinct.iter().any(|t| ISSUE_TERMS.binary_search(t).is_ok());
            let fix = distinct.iter().any(|t| FIX_TERMS.binary_search(t).is_ok());

            if issue {
                issue_mentions += 1;
            }
            if fix {
                fix_mentions += 1;
            }
            if issue && fix {
                issue_fix_pairs.push(record.id.clone());
            }

            total_tokens += tokens.len();
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        Ok(ContextSignals {
            context: context.clone(),
            described,
            issue_mentions,
            fix_mentions,
            issue_density: Ratio::of(issue_mentions, described),
            fix_density: Ratio::of(fix_mentions, described),
            issue_fix_pairs,
            total_tokens,
            distinct_tokens: counts.len(),
            lexical_maturity: Ratio::of(counts.len(), total_tokens),
            top_terms: Self::top_terms(&counts, TOP_TERMS_LIMIT),
        })
    }

    /// Analyzes every context present in `snapshot`.
    pub fn analyze_all(
        snapshot: &RecordSnapshot,
    ) -> Result<BTreeMap<ContextId, ContextSignals>, AnalysisError> {
        snapshot
            .contexts()
            .into_iter()
            .map(|context| {
                let signals = Self::analyze(snapshot, &context)?;
                Ok((context, signals))
            })
            .collect()
    }

    fn top_terms(counts: &BTreeMap<String, usize>, limit: usize) -> Vec<TermCount> {
        let mut terms: Vec<TermCount> = counts
            .iter()
            .map(|(term, &count)| TermCount {
                term: term.clone(),
                count,
            })
            .collect();
        terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(limit);
        terms
    }
}
