//! Gap Report Generation
//!
//! Collects the unmarked accessors of every branch a migration kept around
//! and turns them into a human-readable list of fields nobody migrated.
//!
//! Sibling branches produced from one sequence share a path, so the same
//! accessor name commonly shows up several times; `distinct_items` and
//! `qualified_items` deduplicate.

use crate::marker::Branch;
use crate::result::{MarkerError, MarkerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Gap report summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSummary {
    /// Number of branches recorded
    pub branches: usize,
    /// Total accessors across all recorded branches
    pub total_accessors: usize,
    /// Accessors reported as unmarked
    pub unmarked_accessors: usize,
    /// Share of accessors not reported as unmarked
    pub coverage_percent: f64,
}

/// Unmarked accessors of one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    /// Branch path (display form)
    pub path: String,
    /// Domain type of the branch
    pub type_name: String,
    /// Number of accessors in the branch's catalog
    pub total: usize,
    /// Unmarked accessor names in catalog order
    pub unmarked: Vec<String>,
}

/// Gap report over a set of branches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapReport {
    /// Skip accessors that return null or empty sequences
    ignore_empty: bool,
    entries: Vec<GapEntry>,
}

impl GapReport {
    /// Create a report that lists every unmarked accessor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a report that skips accessors carrying no data
    #[must_use]
    pub fn ignoring_empty() -> Self {
        Self {
            ignore_empty: true,
            entries: Vec::new(),
        }
    }

    /// Whether empty accessors are skipped
    #[must_use]
    pub const fn ignores_empty(&self) -> bool {
        self.ignore_empty
    }

    /// Record the unmarked accessors of a branch
    pub fn record(&mut self, branch: &Branch) -> &mut Self {
        let unmarked = branch.unmarked(self.ignore_empty);
        tracing::debug!(
            path = branch.display_path(),
            unmarked = unmarked.len(),
            "recorded branch"
        );
        self.entries.push(GapEntry {
            path: branch.display_path().to_string(),
            type_name: branch.value().type_name().to_string(),
            total: branch.catalog().len(),
            unmarked,
        });
        self
    }

    /// Record several branches
    pub fn record_all<'a>(&mut self, branches: impl IntoIterator<Item = &'a Branch>) -> &mut Self {
        for branch in branches {
            self.record(branch);
        }
        self
    }

    /// Recorded entries in recording order
    #[must_use]
    pub fn entries(&self) -> &[GapEntry] {
        &self.entries
    }

    /// Unmarked accessor names across all entries, first occurrence wins
    #[must_use]
    pub fn distinct_items(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|e| e.unmarked.iter())
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    /// Unmarked accessors qualified by path (`/people/notes`), deduplicated
    #[must_use]
    pub fn qualified_items(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|e| e.unmarked.iter().map(move |name| qualify(&e.path, name)))
            .filter(|item| seen.insert(item.clone()))
            .collect()
    }

    /// Get report summary
    #[must_use]
    pub fn summary(&self) -> GapSummary {
        let total_accessors: usize = self.entries.iter().map(|e| e.total).sum();
        let unmarked_accessors: usize = self.entries.iter().map(|e| e.unmarked.len()).sum();
        let coverage_percent = if total_accessors == 0 {
            100.0 // Vacuously true
        } else {
            total_accessors.saturating_sub(unmarked_accessors) as f64 / total_accessors as f64 * 100.0
        };
        GapSummary {
            branches: self.entries.len(),
            total_accessors,
            unmarked_accessors,
            coverage_percent,
        }
    }

    /// Check that no recorded branch has unmarked accessors
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|e| e.unmarked.is_empty())
    }

    /// Append the entries of another report
    pub fn merge(&mut self, other: &Self) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> MarkerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> MarkerResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| MarkerError::ReportSerialization {
            message: format!("Failed to serialize gap report: {e}"),
        })
    }
}

impl fmt::Display for GapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        writeln!(
            f,
            "Accessor coverage: {:.1}% ({} of {} unmarked in {} branches)",
            summary.coverage_percent,
            summary.unmarked_accessors,
            summary.total_accessors,
            summary.branches
        )?;
        for item in self.qualified_items() {
            writeln!(f, "  unmarked: {item}")?;
        }
        Ok(())
    }
}

fn qualify(path: &str, name: &str) -> String {
    if path == "/" {
        format!("/{name}")
    } else {
        format!("{path}/{name}")
    }
}
