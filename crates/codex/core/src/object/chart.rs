//! Materialized sentiment declarations, before chart assembly.

use std::sync::Arc;

use crate::class::ObjectClass;
use crate::error::BuildError;
use crate::object::fields::Fields;
use crate::object::WorldObject;
use crate::value::ResolvedValue;

/// The three declaration lists of a `SentimentChart` record, with every
/// faction reference already resolved to a shared [`FactionTag`] handle.
///
/// This is raw material: the queryable relation is assembled from one or
/// more of these by [`crate::SentimentChartBuilder`], which also runs the
/// contradiction checks.
///
/// [`FactionTag`]: ObjectClass::FactionTag
#[derive(Clone, Debug, Default)]
pub struct ChartSpec {
    /// Unordered pairs that like each other.
    pub mutual_pos: Vec<(Arc<WorldObject>, Arc<WorldObject>)>,
    /// Unordered pairs that resent each other.
    pub mutual_neg: Vec<(Arc<WorldObject>, Arc<WorldObject>)>,
    /// Feeler faction name → factions it resents, with no reciprocity.
    ///
    /// Unlike the value side, feelers are plain mapping keys rather than
    /// resolved handles; the loader checks them against the materialized
    /// faction set when charts are merged.
    pub onesided_neg: Vec<(String, Vec<Arc<WorldObject>>)>,
}

impl ChartSpec {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, BuildError> {
        Ok(Self {
            mutual_pos: take_pairs(fields, "mutual_pos")?,
            mutual_neg: take_pairs(fields, "mutual_neg")?,
            onesided_neg: take_onesided(fields, "onesided_neg")?,
        })
    }
}

fn take_pairs(
    fields: &mut Fields,
    key: &str,
) -> Result<Vec<(Arc<WorldObject>, Arc<WorldObject>)>, BuildError> {
    let Some(entries) = fields.take_seq(key)? else {
        return Ok(Vec::new());
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            ResolvedValue::Seq(pair) => match <[ResolvedValue; 2]>::try_from(pair) {
                Ok([a, b]) => Ok((faction(key, a)?, faction(key, b)?)),
                Err(_) => Err(BuildError::invalid(key, "each pair must have two entries")),
            },
            other => Err(BuildError::invalid(
                key,
                format!("expected pairs of faction tags, got {}", other.type_name()),
            )),
        })
        .collect()
}

fn take_onesided(
    fields: &mut Fields,
    key: &str,
) -> Result<Vec<(String, Vec<Arc<WorldObject>>)>, BuildError> {
    let Some(value) = fields.take(key) else {
        return Ok(Vec::new());
    };
    let ResolvedValue::Map(entries) = value else {
        return Err(BuildError::invalid(
            key,
            format!("expected a mapping, got {}", value.type_name()),
        ));
    };
    entries
        .into_iter()
        .map(|(feeler, targets)| {
            // mapping keys are never reference tokens; a leading `#` is
            // accepted for symmetry with the value side
            let feeler = feeler.strip_prefix('#').unwrap_or(&feeler).to_string();
            let ResolvedValue::Seq(targets) = targets else {
                return Err(BuildError::invalid(
                    key,
                    format!("targets of `{feeler}` must be a sequence"),
                ));
            };
            let targets = targets
                .into_iter()
                .map(|target| faction(key, target))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((feeler, targets))
        })
        .collect()
}

fn faction(key: &str, value: ResolvedValue) -> Result<Arc<WorldObject>, BuildError> {
    match value {
        ResolvedValue::Shared(tag) if tag.class == ObjectClass::FactionTag => Ok(tag),
        ResolvedValue::Shared(tag) => Err(BuildError::invalid(
            key,
            format!("`{}` is a {}, expected a FactionTag", tag.id, tag.class),
        )),
        other => Err(BuildError::invalid(
            key,
            format!("expected shared faction tags (`#id`), got {}", other.type_name()),
        )),
    }
}
