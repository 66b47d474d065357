//! Accessor Coverage Tracking
//!
//! Wraps a domain object graph and records which accessors a migration has
//! read, so that fields nobody migrates show up instead of being silently
//! dropped.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  GEDMARK MARKER TREE                                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Domain value → Catalog → Branch::invoke → child Branch(es)     │
//! │                     ↓              ↓                            │
//! │              Fingerprint     unmarked_items → GapReport         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - A [`Catalog`] is built once per [`Branch`]; its `exercised` flags only
//!   ever go from false to true.
//! - Child branches own a clone of the returned domain value, so the marker
//!   tree is always a tree even when the domain graph is not.
//! - [`Fingerprint`] guards [`Branch::mark_all`] against domain-model drift.

mod branch;
mod catalog;
mod fingerprint;

pub use branch::{Branch, Invocation};
pub use catalog::{AccessorDescriptor, Catalog};
pub use fingerprint::Fingerprint;
