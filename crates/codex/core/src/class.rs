//! Class-name dispatch for definition records.

/// The closed set of object classes a definition file may declare.
///
/// The `_class` field of a record is matched against the variant names
/// verbatim (`_class = "FactionTag"`); an unrecognized name is a hard load
/// error, never a silent fallback.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum ObjectClass {
    /// Plain textual tag.
    Tag,
    /// Faction identity tag, the subject of the sentiment chart.
    FactionTag,
    /// Conversation starter tag.
    ConvoTopic,
    /// Damage/effect family tag.
    Family,
    /// Base actor.
    Monster,
    /// Actor with intelligence.
    Character,
    /// Character that can also punch.
    Humanoid,
    /// Long-term condition vector (poison, regeneration, ...).
    Effect,
    /// Anything that hurts on contact: bite, sting, spell.
    Injurious,
    /// Injurious that is also a carryable item.
    Weapon,
    /// Plain carryable item.
    Item,
    /// Strategy: attack own-faction enemies.
    Tribal,
    /// Strategy: attack political enemies.
    PoliticalHater,
    /// Strategy: roam at random.
    Wandering,
    /// Strategy: run away from threats.
    Fleeing,
    /// Strategy: do nothing.
    Paralyzed,
    /// A spoken line of dialogue.
    Line,
    /// A scripted event inside a dialogue.
    DialogueAction,
    /// An ordered dialogue script.
    Dialogue,
    /// Faction sentiment declarations.
    SentimentChart,
}

impl ObjectClass {
    /// Returns the strategy kind when this class names a strategy.
    pub fn strategy_kind(self) -> Option<StrategyKind> {
        match self {
            Self::Tribal => Some(StrategyKind::Tribal),
            Self::PoliticalHater => Some(StrategyKind::PoliticalHater),
            Self::Wandering => Some(StrategyKind::Wandering),
            Self::Fleeing => Some(StrategyKind::Fleeing),
            Self::Paralyzed => Some(StrategyKind::Paralyzed),
            _ => None,
        }
    }

    /// True for the tag family of classes (usable as dialogue speakers,
    /// factions, families, topics).
    pub fn is_tag(self) -> bool {
        matches!(
            self,
            Self::Tag | Self::FactionTag | Self::ConvoTopic | Self::Family
        )
    }
}

/// Behavior kinds a [`crate::Strategy`] can carry.
///
/// Behavior itself is gameplay and out of scope here; the data side carries
/// the kind plus a selection priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum StrategyKind {
    /// Attack actors outside the owner's faction.
    Tribal,
    /// Attack actors the owner's faction resents.
    PoliticalHater,
    /// Roam at random.
    Wandering,
    /// Run away from threats.
    Fleeing,
    /// Do nothing.
    Paralyzed,
}

impl StrategyKind {
    /// Selection priority used when the record does not declare one.
    pub fn default_priority(self) -> f64 {
        match self {
            Self::PoliticalHater => 0.2,
            Self::Fleeing => 0.75,
            Self::Tribal | Self::Wandering | Self::Paralyzed => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn class_names_round_trip() {
        for class in [
            ObjectClass::Tag,
            ObjectClass::FactionTag,
            ObjectClass::Humanoid,
            ObjectClass::SentimentChart,
        ] {
            assert_eq!(ObjectClass::from_str(class.as_ref()), Ok(class));
        }
    }

    #[test]
    fn unknown_class_name_is_rejected() {
        assert!(ObjectClass::from_str("Gargoyle").is_err());
    }

    #[test]
    fn strategy_default_priorities() {
        assert_eq!(StrategyKind::Wandering.default_priority(), 0.5);
        assert_eq!(StrategyKind::PoliticalHater.default_priority(), 0.2);
        assert_eq!(StrategyKind::Fleeing.default_priority(), 0.75);
    }
}
