//! core::stats
//!
//! Per-problem commit statistics persisted under the `stats` store key.
//!
//! # Schema
//!
//! ```json
//! {
//!   "two-sum": {
//!     "lastCommitSha": "3f2a...",
//!     "difficulty": "Easy",
//!     "updatedAt": "2026-10-18T09:30:00Z"
//!   }
//! }
//! ```
//!
//! Fields this crate does not know about are kept as-is when a record is
//! rewritten. The whole object is written back on every update, so two
//! concurrent writers race and the last one wins.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::{Store, StoreError, STATS_KEY};

/// Problem difficulty label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Any other label, kept verbatim.
    Other(String),
}

impl Difficulty {
    /// Parse a label case-insensitively; unknown labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Stats for one problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    /// SHA of the last commit recorded for this problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_sha: Option<String>,

    /// Difficulty label at the time of the last commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// When the record was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Unknown fields, preserved on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tally of recorded problems by difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    /// Problems with another label or none
    pub other: usize,
}

impl DifficultyCounts {
    /// Total number of problems.
    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard + self.other
    }
}

/// The stats object, keyed by problem name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats {
    problems: BTreeMap<String, ProblemStats>,
}

impl Stats {
    /// Load stats from the store; a missing or null value yields empty stats.
    ///
    /// Entries that are not problem records are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidValue` if the stored value is not an
    /// object.
    pub fn load(store: &dyn Store) -> Result<Self, StoreError> {
        let mut problems = BTreeMap::new();
        for (name, value) in read_object(store)? {
            match serde_json::from_value::<ProblemStats>(value) {
                Ok(record) => {
                    problems.insert(name, record);
                }
                Err(e) => log::warn!("skipping stats entry '{}': {}", name, e),
            }
        }
        Ok(Self { problems })
    }

    /// Check that the stored stats can be updated by [`Stats::record`].
    pub fn check(store: &dyn Store) -> Result<(), StoreError> {
        read_object(store).map(|_| ())
    }

    /// Record a commit for one problem directly in the store.
    ///
    /// Only the problem's own entry is rewritten, and within it only the
    /// known fields. Every other value in the stats object is written back
    /// unchanged. An entry that is not an object is replaced.
    pub fn record(
        store: &dyn Store,
        problem: &str,
        commit_sha: &str,
        difficulty: Option<&Difficulty>,
    ) -> Result<(), StoreError> {
        let mut all = read_object(store)?;
        let mut entry = match all.remove(problem) {
            Some(Value::Object(fields)) => fields,
            Some(_) => {
                log::warn!("replacing non-record stats entry for '{}'", problem);
                Map::new()
            }
            None => Map::new(),
        };

        entry.insert(
            "lastCommitSha".to_string(),
            Value::String(commit_sha.to_string()),
        );
        if let Some(difficulty) = difficulty {
            entry.insert(
                "difficulty".to_string(),
                Value::String(difficulty.to_string()),
            );
        }
        entry.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        all.insert(problem.to_string(), Value::Object(entry));
        store.set(STATS_KEY, Value::Object(all))
    }

    /// Get the record for a problem.
    pub fn get(&self, problem: &str) -> Option<&ProblemStats> {
        self.problems.get(problem)
    }

    /// Record a commit for a problem, creating the record if needed.
    pub fn record_commit(
        &mut self,
        problem: &str,
        commit_sha: &str,
        difficulty: Option<&Difficulty>,
    ) {
        let entry = self.problems.entry(problem.to_string()).or_default();
        entry.last_commit_sha = Some(commit_sha.to_string());
        if let Some(difficulty) = difficulty {
            entry.difficulty = Some(difficulty.to_string());
        }
        entry.updated_at = Some(Utc::now());
    }

    /// Iterate over problems in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProblemStats)> {
        self.problems.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Whether no problem has been recorded.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Count recorded problems by difficulty.
    pub fn difficulty_counts(&self) -> DifficultyCounts {
        let mut counts = DifficultyCounts::default();
        for stats in self.problems.values() {
            match stats.difficulty.as_deref().map(Difficulty::parse) {
                Some(Difficulty::Easy) => counts.easy += 1,
                Some(Difficulty::Medium) => counts.medium += 1,
                Some(Difficulty::Hard) => counts.hard += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}

/// The raw stats object; missing or null reads as empty.
fn read_object(store: &dyn Store) -> Result<Map<String, Value>, StoreError> {
    match store.get(STATS_KEY)? {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(StoreError::InvalidValue {
            key: STATS_KEY.to_string(),
            message: "expected an object keyed by problem name".to_string(),
        }),
    }
}
