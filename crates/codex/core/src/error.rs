//! Construction errors for the typed object model.

/// Errors raised while constructing a typed object from resolved attributes.
///
/// These cover the class-constraint layer only: the attribute map handed to
/// [`crate::WorldObject::build`] is already flattened and reference-resolved,
/// so every failure here is an authoring mistake in a definition file (a
/// missing required field, a field of the wrong shape, a reference that
/// resolved to an object of the wrong kind).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A field required by the class is absent after flattening.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: String,
    },

    /// A field is present but its value violates a class constraint.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Human-readable description of the violated constraint.
        reason: String,
    },
}

impl BuildError {
    /// Shorthand for a [`BuildError::MissingField`].
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for a [`BuildError::InvalidField`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
