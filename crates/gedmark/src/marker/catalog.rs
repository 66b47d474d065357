//! Accessor Catalog
//!
//! Ordered descriptors for one domain value, each with a monotonic
//! `exercised` flag. Built once per branch; never grows or shrinks.

use crate::accessor::{Accessible, ResultShape};
use serde::Serialize;

/// Catalog entry for one accessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorDescriptor {
    name: String,
    arity: usize,
    shape: Option<ResultShape>,
    exercised: bool,
}

impl AccessorDescriptor {
    /// Accessor name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared argument count
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Declared result shape, `None` when unclassifiable
    #[must_use]
    pub const fn shape(&self) -> Option<ResultShape> {
        self.shape
    }

    /// Whether the accessor has been invoked or marked
    #[must_use]
    pub const fn is_exercised(&self) -> bool {
        self.exercised
    }

    // false -> true only
    fn exercise(&mut self) {
        self.exercised = true;
    }
}

/// Ordered accessor descriptors of one domain value
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    descriptors: Vec<AccessorDescriptor>,
}

impl Catalog {
    /// Enumerate the accessor table of `value`
    #[must_use]
    ///
    /// Accessors whose result shape cannot be classified are kept, with a
    /// warning naming the accessor.
    pub fn build(value: &dyn Accessible) -> Self {
        let descriptors = value
            .accessors()
            .into_iter()
            .map(|signature| {
                if signature.shape.is_none() {
                    tracing::warn!(
                        type_name = value.type_name(),
                        accessor = %signature.name,
                        arity = signature.arity,
                        "Expected exactly one element type, result shape is unknown"
                    );
                }
                AccessorDescriptor {
                    name: signature.name.into_owned(),
                    arity: signature.arity,
                    shape: signature.shape,
                    exercised: false,
                }
            })
            .collect();
        Self { descriptors }
    }

    /// All descriptors in discovery order
    #[must_use]
    pub fn descriptors(&self) -> &[AccessorDescriptor] {
        &self.descriptors
    }

    /// Descriptor at a position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AccessorDescriptor> {
        self.descriptors.get(index)
    }

    /// Number of descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the value exposes no accessors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Positions of every descriptor named `name`, in discovery order
    #[must_use]
    pub fn positions(&self, name: &str) -> Vec<usize> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.name == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Pick the descriptor to invoke for `name` with `argc` arguments.
    ///
    /// Overloads are narrowed by arity; what remains ambiguous falls back to
    /// the first discovered match with a warning.
    pub(crate) fn resolve(&self, path: &str, name: &str, argc: usize) -> Option<usize> {
        let candidates = self.positions(name);
        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            [first, ..] => {
                let by_arity: Vec<usize> = candidates
                    .iter()
                    .copied()
                    .filter(|&i| self.descriptors[i].arity == argc)
                    .collect();
                if let [only] = by_arity.as_slice() {
                    tracing::debug!(
                        path,
                        accessor = name,
                        arity = argc,
                        "resolved overloaded accessor by arity"
                    );
                    return Some(*only);
                }
                tracing::warn!(
                    path,
                    accessor = name,
                    matches = candidates.len(),
                    "More than one accessor matches, taking the first one"
                );
                Some(by_arity.first().copied().unwrap_or(*first))
            }
        }
    }

    pub(crate) fn exercise(&mut self, index: usize) {
        if let Some(descriptor) = self.descriptors.get_mut(index) {
            descriptor.exercise();
        }
    }

    /// Mark every descriptor named `name`; returns how many matched
    pub(crate) fn mark(&mut self, name: &str) -> usize {
        let mut count = 0;
        for descriptor in self.descriptors.iter_mut().filter(|d| d.name == name) {
            descriptor.exercise();
            count += 1;
        }
        count
    }

    pub(crate) fn mark_all(&mut self) {
        self.descriptors
            .iter_mut()
            .for_each(AccessorDescriptor::exercise);
    }

    /// Descriptor names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    /// Descriptors not yet exercised, with their positions
    pub fn unexercised(&self) -> impl Iterator<Item = (usize, &AccessorDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.exercised)
    }

    /// Number of exercised descriptors
    #[must_use]
    pub fn exercised_count(&self) -> usize {
        self.descriptors.iter().filter(|d| d.exercised).count()
    }
}
