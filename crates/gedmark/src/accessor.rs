//! Accessor Contract
//!
//! The capability a domain type exposes so that a [`Branch`](crate::Branch) can
//! catalogue and intercept its read operations. Rust has no runtime
//! reflection, so every type publishes an explicit accessor table: ordered
//! signatures plus indexed dispatch. `#[derive(Accessible)]` generates the
//! table for structs; it can also be written by hand.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Declared shape of an accessor's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultShape {
    /// Anything that is neither a domain object nor a sequence
    ScalarOrOther,
    /// A member of the tracked domain family
    DomainObject,
    /// Ordered sequence whose elements are domain objects
    SequenceOfDomainObject,
    /// Ordered sequence of anything else
    SequenceOfOther,
}

impl ResultShape {
    /// Whether invocation results of this shape are wrapped into branches
    #[must_use]
    pub const fn is_wrapped(self) -> bool {
        matches!(self, Self::DomainObject | Self::SequenceOfDomainObject)
    }

    /// Whether this shape is an ordered sequence
    #[must_use]
    pub const fn is_sequence(self) -> bool {
        matches!(self, Self::SequenceOfDomainObject | Self::SequenceOfOther)
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScalarOrOther => write!(f, "scalar"),
            Self::DomainObject => write!(f, "object"),
            Self::SequenceOfDomainObject => write!(f, "object-list"),
            Self::SequenceOfOther => write!(f, "list"),
        }
    }
}

/// One entry of a type's accessor table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorSignature {
    /// Accessor name (not necessarily unique)
    pub name: Cow<'static, str>,
    /// Number of arguments the accessor takes
    pub arity: usize,
    /// Declared result shape, `None` when it cannot be classified
    pub shape: Option<ResultShape>,
}

impl AccessorSignature {
    /// Create a signature with a static name
    #[must_use]
    pub const fn new(name: &'static str, arity: usize, shape: Option<ResultShape>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity,
            shape,
        }
    }

    /// Create a signature with an owned name
    #[must_use]
    pub fn owned(name: impl Into<String>, arity: usize, shape: Option<ResultShape>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            arity,
            shape,
        }
    }
}

/// Failures raised while executing an accessor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Wrong number of arguments supplied
    #[error("`{accessor}` takes {expected} argument(s), got {actual}")]
    Arity {
        /// Accessor name
        accessor: String,
        /// Declared arity
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// An argument could not be converted to the declared parameter type
    #[error("argument {position} expected {expected}, got {actual}")]
    ArgumentType {
        /// Zero-based argument position (0 when unknown)
        position: usize,
        /// Expected type
        expected: &'static str,
        /// Kind of the supplied value
        actual: &'static str,
    },

    /// No accessor at the requested table index
    #[error("{type_name} has no accessor at index {index}")]
    UnknownAccessor {
        /// Domain type name
        type_name: &'static str,
        /// Requested index
        index: usize,
    },

    /// The accessor itself failed
    #[error("{0}")]
    Failed(String),
}

impl AccessError {
    /// Check an argument list against a declared arity
    pub fn check_arity(accessor: &str, expected: usize, args: &[Value]) -> Result<(), Self> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(Self::Arity {
                accessor: accessor.to_string(),
                expected,
                actual: args.len(),
            })
        }
    }

    /// Wrap a domain-level failure
    #[must_use]
    pub fn failed(message: impl fmt::Display) -> Self {
        Self::Failed(message.to_string())
    }

    /// Place an argument conversion error at a position
    #[must_use]
    pub fn at_position(self, position: usize) -> Self {
        match self {
            Self::ArgumentType {
                expected, actual, ..
            } => Self::ArgumentType {
                position,
                expected,
                actual,
            },
            other => other,
        }
    }
}

/// A value whose read operations can be catalogued and intercepted.
///
/// `accessors` must return the same table, in the same order, for every value
/// of a type; `access(index, ..)` dispatches to the accessor at that position.
pub trait Accessible: fmt::Debug + 'static {
    /// Name of the concrete domain type
    fn type_name(&self) -> &'static str;

    /// Ordered accessor table
    fn accessors(&self) -> Vec<AccessorSignature>;

    /// Execute the accessor at `index` with `args`
    fn access(&self, index: usize, args: &[Value]) -> Result<Value, AccessError>;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Clone into a new box
    fn clone_boxed(&self) -> Box<dyn Accessible>;
}

impl Clone for Box<dyn Accessible> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
