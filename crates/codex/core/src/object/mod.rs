//! Materialized runtime objects and class dispatch.

mod actors;
mod chart;
mod dialogue;
mod effects;
mod fields;
mod items;
mod strategies;
mod tags;

pub use actors::Actor;
pub use chart::ChartSpec;
pub use dialogue::{Dialogue, DialogueAction, Line};
pub use effects::{Duration, Effect, Injurious, Weapon};
pub use items::Item;
pub use strategies::Strategy;
pub use tags::{ConvoTopic, Tag};

use std::collections::BTreeMap;
use std::fmt;

use crate::class::ObjectClass;
use crate::error::BuildError;
use crate::value::ResolvedValue;
use fields::Fields;

/// A fully materialized runtime entity.
///
/// Shared singletons live in the world registry behind `Arc`; owned clones
/// are plain values embedded in their referencing entity. The `id` of an
/// owned clone is generated (`<template-id>#<serial>`) and is never
/// registry-addressable.
#[derive(Clone, Debug)]
pub struct WorldObject {
    /// Declared id, or generated clone id for owned clones.
    pub id: String,
    /// Effective class after inheritance.
    pub class: ObjectClass,
    /// Class-specific payload.
    pub kind: ObjectKind,
    /// Attributes the class constructor did not recognize, kept for
    /// free-form authoring fields the presentation layer reads.
    pub extras: BTreeMap<String, ResolvedValue>,
}

/// Class-specific payload of a [`WorldObject`].
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// `Tag`, `FactionTag`, and `Family` classes.
    Tag(Tag),
    ConvoTopic(ConvoTopic),
    /// `Monster`, `Character`, and `Humanoid` classes.
    Actor(Actor),
    Effect(Effect),
    Injurious(Injurious),
    Weapon(Weapon),
    Item(Item),
    Strategy(Strategy),
    Line(Line),
    DialogueAction(DialogueAction),
    Dialogue(Dialogue),
    Chart(ChartSpec),
}

impl WorldObject {
    /// Constructs the typed object for `class` from a resolved attribute
    /// map, consuming the fields the class recognizes and retaining the rest
    /// in [`WorldObject::extras`].
    pub fn build(
        class: ObjectClass,
        id: impl Into<String>,
        attrs: BTreeMap<String, ResolvedValue>,
    ) -> Result<Self, BuildError> {
        let id = id.into();
        let mut fields = Fields::new(attrs);
        let kind = match class {
            ObjectClass::Tag | ObjectClass::FactionTag | ObjectClass::Family => {
                ObjectKind::Tag(Tag::from_fields(&id, &mut fields)?)
            }
            ObjectClass::ConvoTopic => {
                ObjectKind::ConvoTopic(ConvoTopic::from_fields(&id, &mut fields)?)
            }
            ObjectClass::Monster | ObjectClass::Character | ObjectClass::Humanoid => {
                ObjectKind::Actor(Actor::from_fields(class, &mut fields)?)
            }
            ObjectClass::Effect => ObjectKind::Effect(Effect::from_fields(&id, &mut fields)?),
            ObjectClass::Injurious => {
                ObjectKind::Injurious(Injurious::from_fields(&id, &mut fields)?)
            }
            ObjectClass::Weapon => ObjectKind::Weapon(Weapon::from_fields(&id, &mut fields)?),
            ObjectClass::Item => ObjectKind::Item(Item::from_fields(&id, &mut fields)?),
            ObjectClass::Tribal
            | ObjectClass::PoliticalHater
            | ObjectClass::Wandering
            | ObjectClass::Fleeing
            | ObjectClass::Paralyzed => {
                let kind = class
                    .strategy_kind()
                    .expect("strategy classes always map to a kind");
                ObjectKind::Strategy(Strategy::from_fields(&id, kind, &mut fields)?)
            }
            ObjectClass::Line => ObjectKind::Line(Line::from_fields(&mut fields)?),
            ObjectClass::DialogueAction => {
                ObjectKind::DialogueAction(DialogueAction::from_fields(&mut fields)?)
            }
            ObjectClass::Dialogue => {
                ObjectKind::Dialogue(Dialogue::from_fields(&id, &mut fields)?)
            }
            ObjectClass::SentimentChart => ObjectKind::Chart(ChartSpec::from_fields(&mut fields)?),
        };
        Ok(Self {
            id,
            class,
            kind,
            extras: fields.finish(),
        })
    }

    /// Display name of the object; falls back to the id for kinds without a
    /// name of their own.
    pub fn name(&self) -> &str {
        match &self.kind {
            ObjectKind::Tag(tag) => &tag.name,
            ObjectKind::ConvoTopic(topic) => &topic.name,
            ObjectKind::Actor(actor) => actor.name.as_deref().unwrap_or(&self.id),
            ObjectKind::Effect(effect) => &effect.name,
            ObjectKind::Injurious(attack) => &attack.name,
            ObjectKind::Weapon(weapon) => &weapon.attack.name,
            ObjectKind::Item(item) => &item.name,
            ObjectKind::Strategy(strategy) => &strategy.name,
            ObjectKind::DialogueAction(action) => &action.name,
            ObjectKind::Dialogue(dialogue) => &dialogue.key,
            ObjectKind::Line(_) | ObjectKind::Chart(_) => &self.id,
        }
    }
}

impl fmt::Display for WorldObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.class, self.id)?;
        if self.name() != self.id {
            write!(f, " ({})", self.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn family(name: &str) -> Arc<WorldObject> {
        Arc::new(WorldObject::build(ObjectClass::Family, name, BTreeMap::new()).unwrap())
    }

    fn attrs(pairs: Vec<(&str, ResolvedValue)>) -> BTreeMap<String, ResolvedValue> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn monster_defaults_to_novice_stats() {
        let obj = WorldObject::build(ObjectClass::Monster, "rat", BTreeMap::new()).unwrap();
        let ObjectKind::Actor(actor) = &obj.kind else {
            panic!("expected an actor");
        };
        assert_eq!(actor.health, 50);
        assert_eq!(actor.armor, 0);
        assert_eq!(actor.strength, 0.5);
        assert_eq!(actor.intelligence, None);
        assert_eq!(actor.fist_r, None);
        assert!(actor.weapon.is_none());
    }

    #[test]
    fn humanoid_fists_default_and_disable() {
        let obj = WorldObject::build(ObjectClass::Humanoid, "novice", BTreeMap::new()).unwrap();
        let ObjectKind::Actor(actor) = &obj.kind else {
            panic!("expected an actor");
        };
        assert_eq!(actor.fist_r, Some(4));
        assert_eq!(actor.fist_l, None);
        assert_eq!(actor.intelligence, Some(0.5));

        let obj = WorldObject::build(
            ObjectClass::Humanoid,
            "pacifist",
            attrs(vec![
                ("fist_r", ResolvedValue::Int(0)),
                ("fist_l", ResolvedValue::Int(3)),
            ]),
        )
        .unwrap();
        let ObjectKind::Actor(actor) = &obj.kind else {
            panic!("expected an actor");
        };
        assert_eq!(actor.fist_r, None);
        assert_eq!(actor.fist_l, Some(3));
    }

    #[test]
    fn unrecognized_attributes_land_in_extras() {
        let obj = WorldObject::build(
            ObjectClass::Monster,
            "wolf",
            attrs(vec![
                ("health", ResolvedValue::Int(25)),
                ("lore", ResolvedValue::Str("howls at dusk".into())),
            ]),
        )
        .unwrap();
        assert_eq!(
            obj.extras.get("lore").and_then(ResolvedValue::as_str),
            Some("howls at dusk")
        );
        assert!(!obj.extras.contains_key("health"));
    }

    #[test]
    fn effect_duration_forms() {
        let fixed = WorldObject::build(
            ObjectClass::Effect,
            "burn",
            attrs(vec![
                ("duration", ResolvedValue::Int(3)),
                ("h_delta", ResolvedValue::Int(-2)),
                ("family", ResolvedValue::Shared(family("heat"))),
            ]),
        )
        .unwrap();
        let ObjectKind::Effect(effect) = &fixed.kind else {
            panic!("expected an effect");
        };
        assert_eq!(effect.duration, Duration::Turns(3));
        assert_eq!(effect.prob, 1.0);

        let ranged = WorldObject::build(
            ObjectClass::Effect,
            "poison",
            attrs(vec![
                (
                    "duration",
                    ResolvedValue::Seq(vec![ResolvedValue::Int(2), ResolvedValue::Int(5)]),
                ),
                ("h_delta", ResolvedValue::Int(-1)),
                ("family", ResolvedValue::Shared(family("poison"))),
            ]),
        )
        .unwrap();
        let ObjectKind::Effect(effect) = &ranged.kind else {
            panic!("expected an effect");
        };
        assert_eq!(effect.duration, Duration::Range(2, 5));
    }

    #[test]
    fn effect_requires_duration() {
        let err = WorldObject::build(
            ObjectClass::Effect,
            "vague",
            attrs(vec![
                ("h_delta", ResolvedValue::Int(-1)),
                ("family", ResolvedValue::Shared(family("acid"))),
            ]),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::missing("duration"));
    }

    #[test]
    fn weapon_rejects_non_family_reference() {
        let not_a_family =
            Arc::new(WorldObject::build(ObjectClass::Tag, "shiny", BTreeMap::new()).unwrap());
        let err = WorldObject::build(
            ObjectClass::Weapon,
            "sword",
            attrs(vec![
                ("damage", ResolvedValue::Int(6)),
                ("family", ResolvedValue::Shared(not_a_family)),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidField { ref field, .. } if field == "family"));
    }

    #[test]
    fn strategy_priority_defaults_per_kind() {
        let obj =
            WorldObject::build(ObjectClass::Fleeing, "flight-or-fight", BTreeMap::new()).unwrap();
        let ObjectKind::Strategy(strategy) = &obj.kind else {
            panic!("expected a strategy");
        };
        assert_eq!(strategy.priority, 0.75);
        assert_eq!(strategy.name, "flight-or-fight");
    }
}
