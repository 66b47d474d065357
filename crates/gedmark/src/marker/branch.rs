//! Coverage branches
//!
//! A [`Branch`] owns one domain value, the catalog of that value's accessors
//! and an immutable path. Accessors are called through [`Branch::invoke`],
//! which records the access and wraps domain-family results into child
//! branches so that coverage can be tracked at any depth.

use super::catalog::Catalog;
use super::fingerprint::Fingerprint;
use crate::accessor::{Accessible, ResultShape};
use crate::result::{MarkerError, MarkerResult};
use crate::value::Value;
use std::fmt;

/// Result of a successful [`Branch::invoke`]
#[derive(Debug)]
pub enum Invocation {
    /// Raw result of a scalar, sequence-of-other, or null-valued accessor
    Value(Value),
    /// Domain object wrapped in a child branch
    Branch(Branch),
    /// Domain objects wrapped one branch per element, all sharing a path
    Branches(Vec<Branch>),
}

impl Invocation {
    /// Take the raw value, if this is one
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Take the child branch, if this is one
    #[must_use]
    pub fn into_branch(self) -> Option<Branch> {
        match self {
            Self::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    /// Take the child branches, if this is a wrapped sequence
    #[must_use]
    pub fn into_branches(self) -> Option<Vec<Branch>> {
        match self {
            Self::Branches(branches) => Some(branches),
            _ => None,
        }
    }

    /// Borrow the raw value as text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.as_str(),
            _ => None,
        }
    }
}

/// Coverage-tracking wrapper around one domain value
#[derive(Debug)]
pub struct Branch {
    value: Box<dyn Accessible>,
    path: String,
    catalog: Catalog,
}

impl Branch {
    /// Wrap the root of a domain graph (empty path)
    #[must_use]
    pub fn root<T: Accessible>(value: T) -> Self {
        Self::new(Box::new(value), "")
    }

    /// Wrap a boxed value at `path`
    #[must_use]
    pub fn new(value: Box<dyn Accessible>, path: impl Into<String>) -> Self {
        let path = path.into();
        let catalog = Catalog::build(value.as_ref());
        tracing::trace!(
            path = %display_path(&path),
            type_name = value.type_name(),
            accessors = catalog.len(),
            "created branch"
        );
        Self {
            value,
            path,
            catalog,
        }
    }

    /// Path of this branch; empty for the root
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path for display; the root renders as `/`
    #[must_use]
    pub fn display_path(&self) -> &str {
        display_path(&self.path)
    }

    /// The wrapped domain value
    #[must_use]
    pub fn value(&self) -> &dyn Accessible {
        self.value.as_ref()
    }

    /// The wrapped value as its concrete type
    #[must_use]
    pub fn downcast_ref<T: Accessible>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Accessor catalog of this branch
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.path, name)
    }

    /// Invoke a zero-argument accessor
    pub fn get(&mut self, name: &str) -> Option<Invocation> {
        self.invoke(name, &[])
    }

    /// Invoke accessor `name` with `args` and record the access.
    ///
    /// Returns `None` when no accessor has that name, when the accessor
    /// fails, or when its result shape is unclassifiable. Domain objects come
    /// back wrapped in child branches at `path/name`.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Option<Invocation> {
        let index = self.catalog.resolve(&self.path, name, args.len())?;
        let shape = self.catalog.get(index)?.shape();

        let result = match self.value.access(index, args) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    path = %self.display_path(),
                    accessor = name,
                    error = %e,
                    "accessor failed"
                );
                return None;
            }
        };
        self.catalog.exercise(index);

        let Some(shape) = shape else {
            tracing::error!(
                path = %self.display_path(),
                accessor = name,
                kind = result.kind(),
                "Expected exactly one element type, result shape is unknown"
            );
            return None;
        };

        match (shape, result) {
            (ResultShape::DomainObject, Value::Node(node)) => {
                Some(Invocation::Branch(Self::new(node, self.child_path(name))))
            }
            (ResultShape::SequenceOfDomainObject, Value::List(items)) => {
                let path = self.child_path(name);
                let mut branches = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Node(node) => branches.push(Self::new(node, path.clone())),
                        other => {
                            tracing::error!(
                                path = %self.display_path(),
                                accessor = name,
                                kind = other.kind(),
                                "sequence element is not a domain object"
                            );
                            return None;
                        }
                    }
                }
                Some(Invocation::Branches(branches))
            }
            (_, result) => Some(Invocation::Value(result)),
        }
    }

    /// Names of all accessors not yet exercised, in catalog order
    #[must_use]
    pub fn unmarked_items(&self) -> Vec<String> {
        self.catalog
            .unexercised()
            .map(|(_, d)| d.name().to_string())
            .collect()
    }

    /// Unexercised accessors that actually carry data.
    ///
    /// Every unexercised zero-argument accessor is executed; those returning
    /// null or an empty sequence, or failing, are left out. Accessors taking
    /// arguments cannot be probed and are left out too. Nothing is marked.
    #[must_use]
    pub fn unmarked_items_ignoring_empty(&self) -> Vec<String> {
        self.catalog
            .unexercised()
            .filter(|(_, d)| d.arity() == 0)
            .filter(|(index, _)| {
                self.value
                    .access(*index, &[])
                    .is_ok_and(|value| !value.is_empty())
            })
            .map(|(_, d)| d.name().to_string())
            .collect()
    }

    /// Unmarked items in either query mode
    #[must_use]
    pub fn unmarked(&self, ignore_empty: bool) -> Vec<String> {
        if ignore_empty {
            self.unmarked_items_ignoring_empty()
        } else {
            self.unmarked_items()
        }
    }

    /// Fingerprint of this branch's path and accessor names
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(&self.path, self.catalog.names())
    }

    /// Mark every accessor, provided `fingerprint` still matches.
    ///
    /// Store the fingerprint alongside a finished migration; once the domain
    /// model changes, the stored value stops matching and nothing is marked.
    pub fn mark_all(&mut self, fingerprint: &str) -> MarkerResult<()> {
        let expected = self.fingerprint();
        if !expected.matches(fingerprint) {
            tracing::error!(
                path = %self.display_path(),
                "Fingerprint is different! Accessors have changed. Not marking all accessors."
            );
            return Err(MarkerError::FingerprintMismatch {
                path: self.display_path().to_string(),
                expected: expected.to_string(),
                provided: fingerprint.to_string(),
            });
        }
        self.catalog.mark_all();
        Ok(())
    }

    /// Mark every accessor without a stored fingerprint.
    ///
    /// Always matches itself, so model drift goes unnoticed.
    pub fn mark_all_unchecked(&mut self) {
        tracing::info!(
            path = %self.display_path(),
            "Using mark_all without a fingerprint. Storing the fingerprint is recommended."
        );
        self.catalog.mark_all();
    }

    /// Mark every accessor named `name` without invoking it
    pub fn mark(&mut self, name: &str) -> &mut Self {
        if self.catalog.mark(name) == 0 {
            tracing::debug!(path = %self.display_path(), accessor = name, "nothing to mark");
        }
        self
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}: {}/{} exercised)",
            self.display_path(),
            self.value.type_name(),
            self.catalog.exercised_count(),
            self.catalog.len()
        )
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
