//! Actor behavior selection data.

use crate::class::StrategyKind;
use crate::error::BuildError;
use crate::object::fields::Fields;

/// The data side of an actor behavior.
///
/// Selection logic lives in the gameplay layer; the codex only carries which
/// kind of behavior a record declared and the priority used to pick between
/// an actor's strategies.
#[derive(Clone, Debug, PartialEq)]
pub struct Strategy {
    pub name: String,
    /// Kind, taken from the record's `_class`.
    pub kind: StrategyKind,
    /// Selection priority in `[0, 1]`.
    pub priority: f64,
}

impl Strategy {
    pub(crate) fn from_fields(
        id: &str,
        kind: StrategyKind,
        fields: &mut Fields,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            name: fields.str_or("name", id)?,
            kind,
            priority: fields.float_or("priority", kind.default_priority())?,
        })
    }
}
