//! Resolved attribute values.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::object::WorldObject;

/// A fully resolved attribute value.
///
/// This is the post-resolution counterpart of the raw file value: every
/// reference token has been replaced by a concrete object handle. Owned
/// handles are independently-owned clones private to the containing object;
/// shared handles point into the world registry and preserve identity across
/// all referrers (`Arc::ptr_eq`).
#[derive(Clone, Debug)]
pub enum ResolvedValue {
    /// String scalar.
    Str(String),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Boolean scalar.
    Bool(bool),
    /// Ordered sequence of values.
    Seq(Vec<ResolvedValue>),
    /// String-keyed mapping of values.
    Map(BTreeMap<String, ResolvedValue>),
    /// Independently-owned clone materialized from a `*id` reference.
    Owned(Box<WorldObject>),
    /// Shared singleton resolved from a `#id` reference.
    Shared(Arc<WorldObject>),
}

impl ResolvedValue {
    /// Short label for the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
            Self::Owned(_) => "owned object",
            Self::Shared(_) => "shared object",
        }
    }

    /// Returns the string content if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content if this is an integer scalar.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric content, widening integers to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }
}
