//! Typed access to a resolved attribute map during construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::BuildError;
use crate::value::ResolvedValue;
use crate::object::WorldObject;

/// Consuming reader over a resolved attribute map.
///
/// Class constructors pop the fields they recognize; whatever is left after
/// construction becomes the object's `extras` map, so free-form authoring
/// fields (display text, lore notes) survive untouched.
pub(crate) struct Fields {
    map: BTreeMap<String, ResolvedValue>,
}

impl Fields {
    pub(crate) fn new(map: BTreeMap<String, ResolvedValue>) -> Self {
        Self { map }
    }

    /// Removes and returns the raw value for `key`.
    pub(crate) fn take(&mut self, key: &str) -> Option<ResolvedValue> {
        self.map.remove(key)
    }

    /// Remaining unconsumed attributes.
    pub(crate) fn finish(self) -> BTreeMap<String, ResolvedValue> {
        self.map
    }

    pub(crate) fn take_str(&mut self, key: &str) -> Result<Option<String>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(ResolvedValue::Str(s)) => Ok(Some(s)),
            Some(other) => Err(wrong_shape(key, "a string", &other)),
        }
    }

    pub(crate) fn require_str(&mut self, key: &str) -> Result<String, BuildError> {
        self.take_str(key)?.ok_or_else(|| BuildError::missing(key))
    }

    /// String field defaulting to `default` (typically the record id).
    pub(crate) fn str_or(&mut self, key: &str, default: &str) -> Result<String, BuildError> {
        Ok(self.take_str(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub(crate) fn take_int(&mut self, key: &str) -> Result<Option<i64>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(ResolvedValue::Int(n)) => Ok(Some(n)),
            Some(other) => Err(wrong_shape(key, "an integer", &other)),
        }
    }

    pub(crate) fn require_int(&mut self, key: &str) -> Result<i64, BuildError> {
        self.take_int(key)?.ok_or_else(|| BuildError::missing(key))
    }

    pub(crate) fn int_or(&mut self, key: &str, default: i64) -> Result<i64, BuildError> {
        Ok(self.take_int(key)?.unwrap_or(default))
    }

    /// Numeric field, widening integers to floats.
    pub(crate) fn take_float(&mut self, key: &str) -> Result<Option<f64>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(value) => value
                .as_float()
                .map(Some)
                .ok_or_else(|| wrong_shape(key, "a number", &value)),
        }
    }

    pub(crate) fn float_or(&mut self, key: &str, default: f64) -> Result<f64, BuildError> {
        Ok(self.take_float(key)?.unwrap_or(default))
    }

    pub(crate) fn require_float(&mut self, key: &str) -> Result<f64, BuildError> {
        self.take_float(key)?.ok_or_else(|| BuildError::missing(key))
    }

    /// Owned-clone handle (`*id` reference site).
    pub(crate) fn take_owned(&mut self, key: &str) -> Result<Option<WorldObject>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(ResolvedValue::Owned(obj)) => Ok(Some(*obj)),
            Some(other) => Err(wrong_shape(key, "an owned object (`*id`)", &other)),
        }
    }

    /// Shared-singleton handle (`#id` reference site).
    pub(crate) fn take_shared(
        &mut self,
        key: &str,
    ) -> Result<Option<Arc<WorldObject>>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(ResolvedValue::Shared(obj)) => Ok(Some(obj)),
            Some(other) => Err(wrong_shape(key, "a shared object (`#id`)", &other)),
        }
    }

    pub(crate) fn take_seq(
        &mut self,
        key: &str,
    ) -> Result<Option<Vec<ResolvedValue>>, BuildError> {
        match self.map.remove(key) {
            None => Ok(None),
            Some(ResolvedValue::Seq(items)) => Ok(Some(items)),
            Some(other) => Err(wrong_shape(key, "a sequence", &other)),
        }
    }

    /// Sequence of owned-clone handles; absent key yields an empty list.
    pub(crate) fn owned_seq(&mut self, key: &str) -> Result<Vec<WorldObject>, BuildError> {
        let Some(items) = self.take_seq(key)? else {
            return Ok(Vec::new());
        };
        items
            .into_iter()
            .map(|item| match item {
                ResolvedValue::Owned(obj) => Ok(*obj),
                other => Err(wrong_shape(key, "owned objects (`*id`)", &other)),
            })
            .collect()
    }

    /// Sequence of shared-singleton handles; absent key yields an empty list.
    pub(crate) fn shared_seq(&mut self, key: &str) -> Result<Vec<Arc<WorldObject>>, BuildError> {
        let Some(items) = self.take_seq(key)? else {
            return Ok(Vec::new());
        };
        items
            .into_iter()
            .map(|item| match item {
                ResolvedValue::Shared(obj) => Ok(obj),
                other => Err(wrong_shape(key, "shared objects (`#id`)", &other)),
            })
            .collect()
    }
}

fn wrong_shape(key: &str, expected: &str, got: &ResolvedValue) -> BuildError {
    BuildError::invalid(key, format!("expected {expected}, got {}", got.type_name()))
}
