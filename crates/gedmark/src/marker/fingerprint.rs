//! Catalog fingerprints for the bulk-override guard.
//!
//! A fingerprint is SHA-512 over a branch path followed by every accessor
//! name in catalog order. It changes whenever the wrapped type gains, loses
//! or reorders accessors, so a stored fingerprint stops matching as soon as
//! the domain model drifts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;

/// Hex-encoded SHA-512 catalog fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Width in hex digits (512 bits)
    pub const WIDTH: usize = 128;

    /// Compute the fingerprint of a path and ordered accessor names
    #[must_use]
    pub fn compute<'a>(path: &str, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(path.as_bytes());
        for name in names {
            hasher.update(name.as_bytes());
        }
        let result = hasher.finalize();
        // two digits per byte keeps leading zeros, so the width is fixed
        Self(format!("{result:x}"))
    }

    /// Wrap a stored fingerprint string (normalised to lower case)
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        Self(hex.trim().to_ascii_lowercase())
    }

    /// Hex digits
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a caller-supplied fingerprint
    #[must_use]
    pub fn matches(&self, provided: &str) -> bool {
        self.0.eq_ignore_ascii_case(provided.trim())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
