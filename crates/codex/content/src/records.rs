//! RevengateFile parsing: file text to raw, unresolved records.
//!
//! This stage is a pure syntax-to-structure transform. It recognizes the
//! header, the `instances`/`templates` sections, the `_class`/`_parent`
//! control fields, and reference-token sigils in string values. It does not
//! validate class names or parent existence; those belong to the later
//! stages.

use std::collections::BTreeMap;

use crate::error::LoadError;

/// The only format version this engine understands.
pub const FORMAT_VERSION: i64 = 0;

/// The only schema flavor this engine understands.
pub const CONTENT_KIND: &str = "templatized-objects";

/// Resolution policy of a reference token, decided by the sigil at the
/// reference site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefPolicy {
    /// `*id`: materialize a fresh, independently-owned clone per use.
    Clone,
    /// `#id`: resolve to the one shared registry object, materializing it
    /// lazily on first use.
    Shared,
}

/// An unresolved symbolic reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefToken {
    pub policy: RefPolicy,
    /// Id of the referenced record.
    pub target: String,
}

/// A raw, unresolved attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Ref(RefToken),
}

/// Which section a record was declared in.
///
/// A structural role, not a type: instances are eagerly materialized into
/// the registry at load time, templates exist only to be cloned or
/// inherited from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordRole {
    Instance,
    Template,
}

/// A raw definition record, before inheritance and reference resolution.
#[derive(Clone, Debug)]
pub struct RawRecord {
    pub id: String,
    /// Declared `_class`; may be inherited instead.
    pub class_name: Option<String>,
    /// Declared `_parent`.
    pub parent_id: Option<String>,
    pub role: RecordRole,
    pub attrs: BTreeMap<String, Value>,
}

/// A parsed definition file: header metadata plus its records.
#[derive(Debug)]
pub struct ParsedFile {
    pub format: i64,
    pub content: String,
    pub description: Option<String>,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct FileHeader {
    format: i64,
    content: String,
    #[serde(default)]
    description: Option<String>,
}

/// Parses one RevengateFile document.
pub fn parse_str(text: &str) -> Result<ParsedFile, LoadError> {
    let mut doc: toml::Table = toml::from_str(text).map_err(|e| LoadError::malformed(e.to_string()))?;

    let header = doc
        .remove("RevengateFile")
        .ok_or_else(|| LoadError::malformed("missing [RevengateFile] header"))?;
    let header: FileHeader = header
        .try_into()
        .map_err(|e| LoadError::malformed(format!("invalid [RevengateFile] header: {e}")))?;
    if header.content != CONTENT_KIND {
        return Err(LoadError::malformed(format!(
            "unsupported content kind `{}`, expected `{CONTENT_KIND}`",
            header.content
        )));
    }
    if header.format != FORMAT_VERSION {
        return Err(LoadError::malformed(format!(
            "unsupported format version {}, expected {FORMAT_VERSION}",
            header.format
        )));
    }

    let mut records = Vec::new();
    for (section, role) in [
        ("instances", RecordRole::Instance),
        ("templates", RecordRole::Template),
    ] {
        let Some(value) = doc.remove(section) else {
            continue;
        };
        let toml::Value::Table(entries) = value else {
            return Err(LoadError::malformed(format!(
                "section `{section}` must be a table"
            )));
        };
        for (id, entry) in entries {
            let toml::Value::Table(table) = entry else {
                return Err(LoadError::malformed(format!(
                    "record `{id}` must be a table"
                )));
            };
            records.push(parse_record(id, role, table)?);
        }
    }

    if let Some((key, _)) = doc.into_iter().next() {
        return Err(LoadError::malformed(format!(
            "unknown top-level section `{key}`"
        )));
    }

    Ok(ParsedFile {
        format: header.format,
        content: header.content,
        description: header.description,
        records,
    })
}

fn parse_record(
    id: String,
    role: RecordRole,
    table: toml::Table,
) -> Result<RawRecord, LoadError> {
    let mut class_name = None;
    let mut parent_id = None;
    let mut attrs = BTreeMap::new();

    for (key, value) in table {
        match key.as_str() {
            "_class" => match value {
                toml::Value::String(name) => class_name = Some(name),
                _ => {
                    return Err(LoadError::malformed(format!(
                        "`_class` of `{id}` must be a string"
                    )));
                }
            },
            "_parent" => match value {
                toml::Value::String(parent) => parent_id = Some(parent),
                toml::Value::Array(_) => return Err(LoadError::MultipleParents { id }),
                _ => {
                    return Err(LoadError::malformed(format!(
                        "`_parent` of `{id}` must be a string"
                    )));
                }
            },
            key_str if key_str.starts_with('_') => {
                return Err(LoadError::malformed(format!(
                    "reserved key `{key_str}` in record `{id}`"
                )));
            }
            // the `+` directive applies to ordinary attributes only
            "+" | "+_class" | "+_parent" => {
                return Err(LoadError::malformed(format!(
                    "invalid append directive `{key}` in record `{id}`"
                )));
            }
            _ => {
                attrs.insert(key, parse_value(value, &id)?);
            }
        }
    }

    Ok(RawRecord {
        id,
        class_name,
        parent_id,
        role,
        attrs,
    })
}

fn parse_value(value: toml::Value, id: &str) -> Result<Value, LoadError> {
    Ok(match value {
        toml::Value::String(text) => parse_scalar(text, id)?,
        toml::Value::Integer(n) => Value::Int(n),
        toml::Value::Float(x) => Value::Float(x),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(_) => {
            return Err(LoadError::malformed(format!(
                "datetime value in record `{id}` has no schema meaning"
            )));
        }
        toml::Value::Array(items) => Value::Seq(
            items
                .into_iter()
                .map(|item| parse_value(item, id))
                .collect::<Result<_, _>>()?,
        ),
        // mapping keys are plain strings, never reference tokens
        toml::Value::Table(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, entry)| Ok((key, parse_value(entry, id)?)))
                .collect::<Result<_, LoadError>>()?,
        ),
    })
}

/// Recognizes reference-token sigils in string scalars.
fn parse_scalar(text: String, id: &str) -> Result<Value, LoadError> {
    let policy = match text.as_bytes().first() {
        Some(b'*') => RefPolicy::Clone,
        Some(b'#') => RefPolicy::Shared,
        _ => return Ok(Value::Str(text)),
    };
    let target = &text[1..];
    if target.is_empty() {
        return Err(LoadError::malformed(format!(
            "empty reference target `{text}` in record `{id}`"
        )));
    }
    Ok(Value::Ref(RefToken {
        policy,
        target: target.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "[RevengateFile]\nformat = 0\ncontent = \"templatized-objects\"\n";

    #[test]
    fn parses_records_from_both_sections() {
        let text = format!(
            r##"{HEADER}
[instances.something]
_class = "Item"
weight = 0.5

[templates.sword]
_class = "Weapon"
damage = 6
family = "#slice"
"##
        );
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.format, 0);
        assert_eq!(parsed.records.len(), 2);

        let something = &parsed.records[0];
        assert_eq!(something.id, "something");
        assert_eq!(something.role, RecordRole::Instance);
        assert_eq!(something.class_name.as_deref(), Some("Item"));
        assert_eq!(something.attrs["weight"], Value::Float(0.5));

        let sword = &parsed.records[1];
        assert_eq!(sword.role, RecordRole::Template);
        assert_eq!(
            sword.attrs["family"],
            Value::Ref(RefToken {
                policy: RefPolicy::Shared,
                target: "slice".to_string(),
            })
        );
    }

    #[test]
    fn header_is_required_and_checked() {
        assert!(matches!(
            parse_str("[instances]\n"),
            Err(LoadError::MalformedFile { .. })
        ));

        let wrong_kind = "[RevengateFile]\nformat = 0\ncontent = \"maps\"\n";
        assert!(matches!(
            parse_str(wrong_kind),
            Err(LoadError::MalformedFile { .. })
        ));

        let future_format = "[RevengateFile]\nformat = 1\ncontent = \"templatized-objects\"\n";
        assert!(matches!(
            parse_str(future_format),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn unknown_top_level_section_is_rejected() {
        let text = format!("{HEADER}[sprites]\n");
        assert!(matches!(
            parse_str(&text),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn reserved_underscore_keys_are_rejected() {
        let text = format!("{HEADER}[instances.x]\n_class = \"Tag\"\n_weight = 1\n");
        assert!(matches!(
            parse_str(&text),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn array_parent_is_multiple_parents() {
        let text = format!("{HEADER}[templates.x]\n_parent = [\"a\", \"b\"]\n");
        assert!(matches!(
            parse_str(&text),
            Err(LoadError::MultipleParents { id }) if id == "x"
        ));
    }

    #[test]
    fn empty_reference_target_is_rejected() {
        let text = format!("{HEADER}[templates.x]\n_class = \"Item\"\nweapon = \"*\"\n");
        assert!(matches!(
            parse_str(&text),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn plain_strings_and_multiline_text_pass_through() {
        let text = format!(
            "{HEADER}[instances.x]\n_class = \"Tag\"\ndesc = \"\"\"long\nwinded\ntale\"\"\"\n"
        );
        let parsed = parse_str(&text).unwrap();
        assert_eq!(
            parsed.records[0].attrs["desc"],
            Value::Str("long\nwinded\ntale".to_string())
        );
    }

    #[test]
    fn map_keys_keep_their_sigils() {
        let text = format!(
            "{HEADER}[instances.chart]\n_class = \"SentimentChart\"\n\n[instances.chart.onesided_neg]\n\"#lumiere\" = [\"#inunus\"]\n"
        );
        let parsed = parse_str(&text).unwrap();
        let Value::Map(onesided) = &parsed.records[0].attrs["onesided_neg"] else {
            panic!("expected a mapping");
        };
        assert!(onesided.contains_key("#lumiere"));
    }
}
