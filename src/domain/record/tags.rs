//! Tags - key-value constraints attached to a decision record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered set of key-value attributes used for constraint matching and
/// historical similarity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a tag, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a tag.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no tags are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates tags in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if these tags hold exactly `value` under `key`.
    pub fn matches_pair(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Pairs of `self` that `other` matches exactly (same key and value),
    /// in ascending key order.
    pub fn shared_with<'a>(&'a self, other: &'a Tags) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter().filter(move |(k, v)| other.matches_pair(k, v))
    }

    /// Number of exactly shared key-value pairs.
    pub fn shared_count(&self, other: &Tags) -> usize {
        self.shared_with(other).count()
    }

    /// Jaccard index over key-value pairs: |A ∩ B| / |A ∪ B|.
    ///
    /// Two empty sets score 0: no tag evidence means no similarity.
    pub fn jaccard(&self, other: &Tags) -> f64 {
        let shared = self.shared_count(other);
        let union = self.len() + other.len() - shared;
        if union == 0 {
            return 0.0;
        }
        shared as f64 / union as f64
    }

    /// Overlap coefficient over key-value pairs: |A ∩ B| / min(|A|, |B|).
    ///
    /// Zero when either side is empty.
    pub fn overlap_coefficient(&self, other: &Tags) -> f64 {
        let smaller = self.len().min(other.len());
        if smaller == 0 {
            return 0.0;
        }
        self.shared_count(other) as f64 / smaller as f64
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_high() -> Tags {
        Tags::new().with("severity", "high").with("system", "db")
    }

    #[test]
    fn shared_requires_exact_value() {
        let other = Tags::new().with("severity", "low").with("system", "db");
        assert_eq!(db_high().shared_count(&other), 1);
    }

    #[test]
    fn matches_pair_checks_own_value() {
        let tags = db_high();
        assert!(tags.matches_pair("system", "db"));
        assert!(!tags.matches_pair("system", "cache"));
        assert!(!tags.matches_pair("region", "db"));
    }

    #[test]
    fn jaccard_identical_is_one() {
        assert!((db_high().jaccard(&db_high()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let other = Tags::new().with("system", "db").with("team", "ops");
        // shared {system=db}, union {severity, system, team}
        assert!((db_high().jaccard(&other) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_empty_sets_score_zero() {
        assert_eq!(Tags::new().jaccard(&Tags::new()), 0.0);
    }

    #[test]
    fn overlap_coefficient_uses_smaller_side() {
        let small = Tags::new().with("system", "db");
        assert!((small.overlap_coefficient(&db_high()) - 1.0).abs() < f64::EPSILON);
        assert_eq!(small.overlap_coefficient(&Tags::new()), 0.0);
    }

    #[test]
    fn displays_sorted_pairs() {
        assert_eq!(db_high().to_string(), "{severity=high, system=db}");
    }

    #[test]
    fn deserializes_from_map() {
        let tags: Tags = serde_json::from_str(r#"{"system":"db","severity":"high"}"#).unwrap();
        assert_eq!(tags, db_high());
    }
}
