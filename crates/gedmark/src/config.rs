//! Audit configuration
//!
//! Stored fingerprints and ignore lists live outside the migration code, in a
//! YAML or JSON file keyed by branch path. Once the domain model changes, a
//! stored fingerprint stops matching and the bulk override is refused.
//!
//! ```yaml
//! ignore_empty: true
//! fingerprints:
//!   /people/notes: 3b1f...
//! ignored:
//!   /:
//!     - header
//!   /people:
//!     - extensions
//! ```

use crate::marker::{Branch, Fingerprint};
use crate::report::GapReport;
use crate::result::{MarkerError, MarkerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-path fingerprints and ignore lists for a migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Skip accessors that return null or empty sequences in reports
    pub ignore_empty: bool,
    /// Stored fingerprints by display path; a match marks the whole branch
    pub fingerprints: BTreeMap<String, Fingerprint>,
    /// Accessor names to mark without invoking, by display path
    pub ignored: BTreeMap<String, Vec<String>>,
}

impl AuditConfig {
    /// Create an empty config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip empty accessors in reports
    #[must_use]
    pub const fn ignore_empty(mut self, enabled: bool) -> Self {
        self.ignore_empty = enabled;
        self
    }

    /// Store a fingerprint for a path
    #[must_use]
    pub fn with_fingerprint(mut self, path: &str, fingerprint: Fingerprint) -> Self {
        let _ = self.fingerprints.insert(path.to_string(), fingerprint);
        self
    }

    /// Ignore accessor names at a path
    #[must_use]
    pub fn with_ignored<I, S>(mut self, path: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored
            .entry(path.to_string())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Store the current fingerprint of a branch
    pub fn capture(&mut self, branch: &Branch) -> &mut Self {
        let _ = self
            .fingerprints
            .insert(branch.display_path().to_string(), branch.fingerprint());
        self
    }

    /// Apply ignore list and stored fingerprint to a branch.
    ///
    /// Ignored names are always marked. A stored fingerprint goes through the
    /// guarded bulk override; on mismatch the error is returned and nothing
    /// beyond the ignored names is marked.
    pub fn apply(&self, branch: &mut Branch) -> MarkerResult<()> {
        let path = branch.display_path().to_string();
        if let Some(names) = self.ignored.get(&path) {
            for name in names {
                branch.mark(name);
            }
            tracing::debug!(path = %path, ignored = names.len(), "applied ignore list");
        }
        match self.fingerprints.get(&path) {
            Some(fingerprint) => branch.mark_all(fingerprint.as_str()),
            None => Ok(()),
        }
    }

    /// Apply to several branches, continuing past mismatches.
    ///
    /// Returns the display paths whose stored fingerprint did not match.
    pub fn apply_all<'a>(&self, branches: impl IntoIterator<Item = &'a mut Branch>) -> Vec<String> {
        let mut stale = Vec::new();
        for branch in branches {
            if let Err(MarkerError::FingerprintMismatch { path, .. }) = self.apply(branch) {
                if !stale.contains(&path) {
                    stale.push(path);
                }
            }
        }
        stale
    }

    /// Create a gap report honouring `ignore_empty`
    #[must_use]
    pub fn report(&self) -> GapReport {
        if self.ignore_empty {
            GapReport::ignoring_empty()
        } else {
            GapReport::new()
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> MarkerResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> MarkerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> MarkerResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> MarkerResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(MarkerError::config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };
        tracing::info!(
            path = %path.display(),
            fingerprints = config.fingerprints.len(),
            ignored_paths = config.ignored.len(),
            "loaded audit config"
        );
        Ok(config)
    }

    /// Save as YAML, creating parent directories
    pub fn save_yaml(&self, path: &Path) -> MarkerResult<()> {
        let yaml = self.to_yaml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;
        Ok(())
    }
}
