//! Textual tagging: plain tags, faction tags, families, conversation topics.

use crate::error::BuildError;
use crate::object::fields::Fields;

/// An individual tag.
///
/// Used as-is for the `Tag`, `FactionTag`, and `Family` classes; the class
/// carried by the enclosing [`crate::WorldObject`] tells them apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Tag name; must start with an alphabetic character.
    pub name: String,
    /// Optional free-text description.
    pub desc: Option<String>,
}

impl Tag {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        let name = fields.str_or("name", id)?;
        validate_tag_name(&name)?;
        Ok(Self {
            name,
            desc: fields.take_str("desc")?,
        })
    }
}

/// A conversation starter tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvoTopic {
    /// Topic name, same constraint as [`Tag::name`].
    pub name: String,
    /// Optional free-text description.
    pub desc: Option<String>,
    /// Speech register the topic is delivered in.
    pub register: Option<String>,
}

impl ConvoTopic {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        let name = fields.str_or("name", id)?;
        validate_tag_name(&name)?;
        Ok(Self {
            name,
            desc: fields.take_str("desc")?,
            register: fields.take_str("register")?,
        })
    }
}

fn validate_tag_name(name: &str) -> Result<(), BuildError> {
    if name.chars().next().is_some_and(char::is_alphabetic) {
        Ok(())
    } else {
        Err(BuildError::invalid(
            "name",
            format!("tag name must start with a letter, received `{name}`"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::value::ResolvedValue;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        Fields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), ResolvedValue::Str(v.to_string())))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn name_defaults_to_record_id() {
        let tag = Tag::from_fields("lumiere", &mut fields(&[])).unwrap();
        assert_eq!(tag.name, "lumiere");
        assert_eq!(tag.desc, None);
    }

    #[test]
    fn non_alphabetic_name_is_rejected() {
        let err = Tag::from_fields("x", &mut fields(&[("name", "9lives")])).unwrap_err();
        assert!(matches!(err, BuildError::InvalidField { .. }));
    }

    #[test]
    fn convo_topic_carries_register() {
        let topic =
            ConvoTopic::from_fields("bribery", &mut fields(&[("register", "formal")])).unwrap();
        assert_eq!(topic.register.as_deref(), Some("formal"));
    }
}
