//! Typed object model for the Revengate definition engine.
//!
//! `codex-core` defines the runtime entities (actors, effects, weapons,
//! strategies, tags, dialogues, the faction sentiment chart) and how each of
//! them is constructed from a resolved attribute map. It is pure data plus
//! validation: file parsing, prototype inheritance, and reference resolution
//! live in `codex-content` and drive the constructors exposed here.
pub mod class;
pub mod error;
pub mod object;
pub mod sentiment;
pub mod value;

pub use class::{ObjectClass, StrategyKind};
pub use error::BuildError;
pub use object::{
    Actor, ChartSpec, ConvoTopic, Dialogue, DialogueAction, Duration, Effect, Injurious, Item,
    Line, ObjectKind, Strategy, Tag, Weapon, WorldObject,
};
pub use sentiment::{Sentiment, SentimentChart, SentimentChartBuilder, SentimentConflict};
pub use value::ResolvedValue;

/// Damage/effect families every registry starts with.
///
/// Definition files may reference these (`#poison`) without declaring them;
/// declaring an id that collides with one of them is a duplicate-id error.
pub const BUILTIN_FAMILIES: [&str; 8] = [
    "impact", "slice", "pierce", "arcane", "heat", "acid", "poison", "chemical",
];
