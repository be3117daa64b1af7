//! Actors: monsters, characters, humanoids.

use std::sync::Arc;

use crate::class::ObjectClass;
use crate::error::BuildError;
use crate::object::fields::Fields;
use crate::object::WorldObject;

/// A materialized actor.
///
/// One struct serves the `Monster`, `Character`, and `Humanoid` classes:
/// `intelligence` is populated for characters and humanoids, the fists only
/// for humanoids. The class carried by the enclosing [`WorldObject`] records
/// which shape was declared.
#[derive(Clone, Debug)]
pub struct Actor {
    pub health: i64,
    pub armor: i64,
    pub strength: f64,
    pub agility: f64,
    /// Characters and humanoids only.
    pub intelligence: Option<f64>,
    /// Humanoids only; `None` when disabled with an explicit 0.
    pub fist_r: Option<i64>,
    /// Humanoids only; off unless declared.
    pub fist_l: Option<i64>,

    // taxon and identifiers, all free-form
    pub species: Option<String>,
    pub role: Option<String>,
    pub rank: Option<String>,
    pub name: Option<String>,

    /// Natural or carried attack; owned clone of an Injurious or Weapon.
    pub weapon: Option<Box<WorldObject>>,
    /// Behavior repertoire; owned Strategy clones in declaration order.
    pub strategies: Vec<WorldObject>,
    /// Faction allegiance; shared with every other member.
    pub faction: Option<Arc<WorldObject>>,
    /// Damage families this actor resists; shared Family tags.
    pub resistances: Vec<Arc<WorldObject>>,
}

impl Actor {
    pub(crate) fn from_fields(
        class: ObjectClass,
        fields: &mut Fields,
    ) -> Result<Self, BuildError> {
        let weapon = match fields.take_owned("weapon")? {
            Some(obj) if matches!(obj.class, ObjectClass::Injurious | ObjectClass::Weapon) => {
                Some(Box::new(obj))
            }
            Some(obj) => {
                return Err(BuildError::invalid(
                    "weapon",
                    format!("`{}` is a {}, expected an Injurious or Weapon", obj.id, obj.class),
                ));
            }
            None => None,
        };

        let strategies = fields.owned_seq("strategies")?;
        for strategy in &strategies {
            if strategy.class.strategy_kind().is_none() {
                return Err(BuildError::invalid(
                    "strategies",
                    format!("`{}` is a {}, expected a strategy", strategy.id, strategy.class),
                ));
            }
        }

        let faction = match fields.take_shared("faction")? {
            Some(tag) if tag.class == ObjectClass::FactionTag => Some(tag),
            Some(tag) => {
                return Err(BuildError::invalid(
                    "faction",
                    format!("`{}` is a {}, expected a FactionTag", tag.id, tag.class),
                ));
            }
            None => None,
        };

        let resistances = fields.shared_seq("resistances")?;
        for family in &resistances {
            if family.class != ObjectClass::Family {
                return Err(BuildError::invalid(
                    "resistances",
                    format!("`{}` is a {}, expected a Family", family.id, family.class),
                ));
            }
        }

        // novice stat line when the record stays silent
        let intelligence = if class == ObjectClass::Monster {
            None
        } else {
            Some(fields.float_or("intelligence", 0.5)?)
        };
        let (fist_r, fist_l) = if class == ObjectClass::Humanoid {
            (
                fist_damage(fields.int_or("fist_r", 4)?),
                fields.take_int("fist_l")?.and_then(fist_damage),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            health: fields.int_or("health", 50)?,
            armor: fields.int_or("armor", 0)?,
            strength: fields.float_or("strength", 0.5)?,
            agility: fields.float_or("agility", 0.5)?,
            intelligence,
            fist_r,
            fist_l,
            species: fields.take_str("species")?,
            role: fields.take_str("role")?,
            rank: fields.take_str("rank")?,
            name: fields.take_str("name")?,
            weapon,
            strategies,
            faction,
            resistances,
        })
    }
}

/// A declared fist damage of 0 disables the fist.
fn fist_damage(damage: i64) -> Option<i64> {
    (damage != 0).then_some(damage)
}
