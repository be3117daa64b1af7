//! Dialogue scripts: lines, scripted actions, and their containers.

use std::sync::Arc;

use crate::class::ObjectClass;
use crate::error::BuildError;
use crate::object::fields::Fields;
use crate::object::WorldObject;
use crate::value::ResolvedValue;

/// A spoken line.
#[derive(Clone, Debug)]
pub struct Line {
    pub text: String,
    /// Speaker tag; shared so every line by the same speaker agrees.
    pub speaker: Option<Arc<WorldObject>>,
    /// Name of a gameplay function invoked after the line is spoken.
    pub after_ftag: Option<String>,
}

impl Line {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, BuildError> {
        let speaker = match fields.take_shared("speaker")? {
            Some(tag) if tag.class.is_tag() => Some(tag),
            Some(tag) => {
                return Err(BuildError::invalid(
                    "speaker",
                    format!("`{}` is a {}, expected a tag", tag.id, tag.class),
                ));
            }
            None => None,
        };
        Ok(Self {
            text: fields.require_str("text")?,
            speaker,
            after_ftag: fields.take_str("after_ftag")?,
        })
    }
}

/// An event taking place during a dialogue.
#[derive(Clone, Debug)]
pub struct DialogueAction {
    /// Name of the gameplay function to call.
    pub name: String,
    /// Arguments forwarded verbatim.
    pub args: Vec<ResolvedValue>,
    /// Function called with the action's result afterwards.
    pub after_ftag: Option<String>,
}

impl DialogueAction {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, BuildError> {
        Ok(Self {
            name: fields.require_str("name")?,
            args: fields.take_seq("args")?.unwrap_or_default(),
            after_ftag: fields.take_str("after_ftag")?,
        })
    }
}

/// An ordered dialogue script.
#[derive(Clone, Debug)]
pub struct Dialogue {
    pub key: String,
    /// Script elements in play order; owned Line/DialogueAction clones.
    pub elems: Vec<WorldObject>,
}

impl Dialogue {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        let elems = fields.owned_seq("elems")?;
        for elem in &elems {
            if !matches!(elem.class, ObjectClass::Line | ObjectClass::DialogueAction) {
                return Err(BuildError::invalid(
                    "elems",
                    format!(
                        "`{}` is a {}, expected a Line or DialogueAction",
                        elem.id, elem.class
                    ),
                ));
            }
        }
        Ok(Self {
            key: fields.str_or("key", id)?,
            elems,
        })
    }
}
