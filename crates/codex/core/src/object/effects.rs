//! Effects and effect vectors: conditions over time and things that hurt.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::class::ObjectClass;
use crate::error::BuildError;
use crate::object::fields::Fields;
use crate::object::WorldObject;
use crate::value::ResolvedValue;

/// How long an effect lingers once applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duration {
    /// Fixed number of turns.
    Turns(u32),
    /// Uniformly random number of turns in `[min, max]`, rolled on
    /// application.
    Range(u32, u32),
}

impl Duration {
    /// Parses a declared duration: either an integer or a two-integer
    /// sequence `[min, max]`.
    fn from_value(value: ResolvedValue) -> Result<Self, BuildError> {
        match value {
            ResolvedValue::Int(n) => Ok(Self::Turns(to_turns(n)?)),
            ResolvedValue::Seq(items) => match items.as_slice() {
                [ResolvedValue::Int(lo), ResolvedValue::Int(hi)] => {
                    let (lo, hi) = (to_turns(*lo)?, to_turns(*hi)?);
                    if lo > hi {
                        return Err(BuildError::invalid(
                            "duration",
                            format!("range minimum {lo} exceeds maximum {hi}"),
                        ));
                    }
                    Ok(Self::Range(lo, hi))
                }
                _ => Err(BuildError::invalid(
                    "duration",
                    "range form must be a sequence of exactly two integers",
                )),
            },
            other => Err(BuildError::invalid(
                "duration",
                format!("expected an integer or [min, max], got {}", other.type_name()),
            )),
        }
    }
}

fn to_turns(n: i64) -> Result<u32, BuildError> {
    u32::try_from(n)
        .map_err(|_| BuildError::invalid("duration", format!("turn count {n} out of range")))
}

/// A long-term effect: a health delta applied every turn for a duration,
/// plus optional attribute deltas while active.
#[derive(Clone, Debug)]
pub struct Effect {
    pub name: String,
    pub duration: Duration,
    /// Health change per turn; negative values are damage.
    pub h_delta: i64,
    /// Damage/effect family, shared with every other user of the family.
    pub family: Arc<WorldObject>,
    /// Verb used by message generation ("poisons", "burns").
    pub verb: Option<String>,
    /// Probability in `[0, 1]` that the effect takes hold on contact.
    pub prob: f64,
    /// Attribute name → delta while the effect is active.
    pub attribute_deltas: BTreeMap<String, i64>,
}

impl Effect {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        let duration = fields
            .take("duration")
            .ok_or_else(|| BuildError::missing("duration"))
            .and_then(Duration::from_value)?;
        Ok(Self {
            name: fields.str_or("name", id)?,
            duration,
            h_delta: fields.require_int("h_delta")?,
            family: require_family(fields, "family")?,
            verb: fields.take_str("verb")?,
            prob: fields.float_or("prob", 1.0)?,
            attribute_deltas: take_attribute_deltas(fields)?,
        })
    }
}

/// Anything that hurts on contact: a bite, a sting, a spell, a toxin.
#[derive(Clone, Debug)]
pub struct Injurious {
    pub name: String,
    pub damage: i64,
    /// Damage family, shared.
    pub family: Arc<WorldObject>,
    /// Verb used by message generation ("bites", "slashes").
    pub verb: Option<String>,
    /// Secondary effects delivered on a hit; owned clones.
    pub effects: Vec<WorldObject>,
}

impl Injurious {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        let effects = fields.owned_seq("effects")?;
        for effect in &effects {
            if effect.class != ObjectClass::Effect {
                return Err(BuildError::invalid(
                    "effects",
                    format!("`{}` is a {}, expected an Effect", effect.id, effect.class),
                ));
            }
        }
        Ok(Self {
            name: fields.str_or("name", id)?,
            damage: fields.require_int("damage")?,
            family: require_family(fields, "family")?,
            verb: fields.take_str("verb")?,
            effects,
        })
    }
}

/// An [`Injurious`] that is also a carryable item.
#[derive(Clone, Debug)]
pub struct Weapon {
    pub attack: Injurious,
    pub weight: f64,
    /// Display glyph, consumed from the `char` attribute.
    pub glyph: Option<String>,
}

impl Weapon {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        Ok(Self {
            attack: Injurious::from_fields(id, fields)?,
            weight: fields.float_or("weight", 0.0)?,
            glyph: fields.take_str("char")?,
        })
    }
}

/// Shared `#family` handle, checked to actually be a Family tag.
fn require_family(fields: &mut Fields, key: &str) -> Result<Arc<WorldObject>, BuildError> {
    let handle = fields
        .take_shared(key)?
        .ok_or_else(|| BuildError::missing(key))?;
    if handle.class != ObjectClass::Family {
        return Err(BuildError::invalid(
            key,
            format!("`{}` is a {}, expected a Family", handle.id, handle.class),
        ));
    }
    Ok(handle)
}

fn take_attribute_deltas(fields: &mut Fields) -> Result<BTreeMap<String, i64>, BuildError> {
    let Some(value) = fields.take("attribute_deltas") else {
        return Ok(BTreeMap::new());
    };
    let ResolvedValue::Map(entries) = value else {
        return Err(BuildError::invalid(
            "attribute_deltas",
            format!("expected a mapping, got {}", value.type_name()),
        ));
    };
    entries
        .into_iter()
        .map(|(attr, delta)| {
            delta.as_int().map(|n| (attr, n)).ok_or_else(|| {
                BuildError::invalid("attribute_deltas", "deltas must be integers")
            })
        })
        .collect()
}
