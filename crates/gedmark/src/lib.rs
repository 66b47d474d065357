//! Gedmark: accessor coverage tracking for GEDCOM migrations
//!
//! A migration reads a parsed genealogy record set through hand-written
//! code that calls accessors selectively. Any field that exists in the source
//! but is never read is silently lost. Gedmark wraps the record set, records
//! every accessor the migration calls, and reports the ones nobody called.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    GEDMARK Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Domain     │    │ Marker     │    │ Gap        │            │
//! │   │ graph      │───►│ tree       │───►│ report     │            │
//! │   │ (derive)   │    │ (Branch)   │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         ▲                  ▲                                     │
//! │   #[derive(Accessible)]  AuditConfig (fingerprints, ignores)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gedmark::{Accessible, Branch, GapReport, Invocation};
//!
//! #[derive(Debug, Clone, serde::Deserialize, Accessible)]
//! struct Gedcom {
//!     people: Vec<Person>,
//!     sources: Vec<Source>,
//! }
//!
//! let gedcom: Gedcom = serde_json::from_str(&std::fs::read_to_string("family.json")?)?;
//! let mut report = GapReport::new();
//!
//! let mut root = Branch::root(gedcom);
//! let people = root
//!     .get("people")
//!     .and_then(Invocation::into_branches)
//!     .unwrap_or_default();
//! for mut person in people {
//!     let _ = person.get("names");
//!     report.record(&person);
//! }
//! report.record(&root);
//! println!("{report}");
//! ```

#![warn(missing_docs)]

// Lets the derive macro's `::gedmark::` paths resolve inside this crate.
extern crate self as gedmark;

/// Accessor contract implemented by domain types
pub mod accessor;

/// Audit configuration (Stored fingerprints and ignore lists)
pub mod config;

/// Logging setup
pub mod logging;

/// Accessor coverage tracking
#[allow(clippy::module_name_repetitions)]
pub mod marker;

/// GEDCOM personal name decomposition
pub mod names;

/// Gap reports
pub mod report;

mod result;

/// Dynamic accessor values
pub mod value;

pub use accessor::{AccessError, Accessible, AccessorSignature, ResultShape};
pub use config::AuditConfig;
pub use marker::{AccessorDescriptor, Branch, Catalog, Fingerprint, Invocation};
pub use names::PersonalName;
pub use report::{GapEntry, GapReport, GapSummary};
pub use result::{MarkerError, MarkerResult};
pub use value::{FromValue, Shaped, Value};

#[cfg(feature = "derive")]
pub use gedmark_derive::Accessible;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        AccessError, Accessible, AuditConfig, Branch, Fingerprint, GapReport, Invocation,
        MarkerError, MarkerResult, ResultShape, Shaped, Value,
    };
}
