//! Load-time error taxonomy.

use codex_core::{BuildError, SentimentConflict};

/// Everything that can go wrong while loading a definition file set.
///
/// All variants are fail-fast: any of them aborts the whole load and no
/// partially built world is ever published. Each carries enough context
/// (offending id, full cycle path) to diagnose the authoring mistake in the
/// definition files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Structural problem in a definition file: bad syntax, unknown
    /// top-level section, invalid header, malformed directive.
    #[error("malformed definition file: {reason}")]
    MalformedFile {
        /// What was wrong, in authoring terms.
        reason: String,
    },

    /// The same id was declared twice across the loaded file set (or
    /// collides with a built-in family).
    #[error("duplicate id `{id}`")]
    DuplicateId { id: String },

    /// A record's `_parent` chain revisits itself.
    #[error("inheritance cycle detected: {}", path.join(" -> "))]
    InheritanceCycle {
        /// The cycle, starting and ending at the revisited id.
        path: Vec<String>,
    },

    /// A record names a parent that does not exist.
    #[error("record `{id}` names unknown parent `{parent}`")]
    UnknownParent { id: String, parent: String },

    /// A record declares more than one parent.
    #[error("record `{id}` declares more than one parent")]
    MultipleParents { id: String },

    /// A record ends up with no class, declared or inherited.
    #[error("record `{id}` has no class, declared or inherited")]
    MissingClass { id: String },

    /// A reference token names an id that is not declared anywhere.
    #[error("unresolved reference to `{target}`")]
    UnresolvedReference { target: String },

    /// Resolving a reference revisited an id whose materialization is still
    /// in progress.
    #[error("reference cycle detected: {}", path.join(" -> "))]
    ReferenceCycle {
        /// The in-progress ids, starting and ending at the revisited one.
        path: Vec<String>,
    },

    /// A record declares a `_class` outside the supported set.
    #[error("record `{id}` declares unknown class `{class}`")]
    UnknownClass { id: String, class: String },

    /// A class constructor rejected the record's resolved attributes.
    #[error("record `{id}`: {source}")]
    InvalidField {
        id: String,
        #[source]
        source: BuildError,
    },

    /// Contradictory sentiment declarations.
    #[error(transparent)]
    SentimentConflict(#[from] SentimentConflict),

    /// Definition file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFile {
            reason: reason.into(),
        }
    }
}
