//! Prototype inheritance: parent chains flattened into effective attribute
//! maps.

use std::collections::BTreeMap;

use crate::error::LoadError;
use crate::records::{RawRecord, RecordRole, Value};

/// A record with its full parent chain folded in.
#[derive(Clone, Debug)]
pub struct FlatRecord {
    pub id: String,
    /// Effective class, declared or inherited.
    pub class: String,
    pub role: RecordRole,
    /// Effective attributes, still holding unresolved reference tokens.
    pub attrs: BTreeMap<String, Value>,
}

/// Flattens every record in the set.
///
/// Flattening is memoized per id: templates that parent many children are
/// folded once and their effective map is shared by all descendants.
pub fn flatten_all(
    records: &BTreeMap<String, RawRecord>,
) -> Result<BTreeMap<String, FlatRecord>, LoadError> {
    let mut flattened = BTreeMap::new();
    for record in records.values() {
        flatten(record, records, &mut flattened, &mut Vec::new())?;
    }
    Ok(flattened)
}

fn flatten(
    record: &RawRecord,
    records: &BTreeMap<String, RawRecord>,
    flattened: &mut BTreeMap<String, FlatRecord>,
    visiting: &mut Vec<String>,
) -> Result<(), LoadError> {
    if flattened.contains_key(&record.id) {
        return Ok(());
    }
    if let Some(pos) = visiting.iter().position(|id| id == &record.id) {
        let mut path = visiting[pos..].to_vec();
        path.push(record.id.clone());
        return Err(LoadError::InheritanceCycle { path });
    }

    let (inherited_class, mut attrs) = match &record.parent_id {
        Some(parent_id) => {
            let parent = records.get(parent_id).ok_or_else(|| LoadError::UnknownParent {
                id: record.id.clone(),
                parent: parent_id.clone(),
            })?;
            visiting.push(record.id.clone());
            let outcome = flatten(parent, records, flattened, visiting);
            visiting.pop();
            outcome?;
            let parent_flat = &flattened[parent_id];
            (Some(parent_flat.class.clone()), parent_flat.attrs.clone())
        }
        None => (None, BTreeMap::new()),
    };

    merge(&mut attrs, &record.attrs, &record.id)?;

    let class = record
        .class_name
        .clone()
        .or(inherited_class)
        .ok_or_else(|| LoadError::MissingClass {
            id: record.id.clone(),
        })?;

    tracing::debug!("flattened `{}` as {class}", record.id);
    flattened.insert(
        record.id.clone(),
        FlatRecord {
            id: record.id.clone(),
            class,
            role: record.role,
            attrs,
        },
    );
    Ok(())
}

/// Folds one record's own attributes onto the inherited map.
///
/// Append directives are applied before plain keys, so a record declaring
/// both `key` and `+key` resolves the way the chain fold always has: the
/// plain assignment wins.
fn merge(
    base: &mut BTreeMap<String, Value>,
    own: &BTreeMap<String, Value>,
    id: &str,
) -> Result<(), LoadError> {
    for (key, value) in own {
        let Some(target) = key.strip_prefix('+') else {
            continue;
        };
        let Value::Seq(additions) = value else {
            return Err(LoadError::malformed(format!(
                "append directive `{key}` of `{id}` must hold a sequence"
            )));
        };
        match base.get_mut(target) {
            Some(Value::Seq(items)) => items.extend(additions.iter().cloned()),
            Some(_) => {
                return Err(LoadError::malformed(format!(
                    "append directive `{key}` of `{id}` cannot append to a non-sequence"
                )));
            }
            None => {
                tracing::warn!(
                    "append directive `{key}` of `{id}` has no inherited value, \
                     acting as plain assignment"
                );
                base.insert(target.to_string(), value.clone());
            }
        }
    }
    for (key, value) in own {
        if !key.starts_with('+') {
            base.insert(key.clone(), value.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        class: Option<&str>,
        parent: Option<&str>,
        attrs: Vec<(&str, Value)>,
    ) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            class_name: class.map(str::to_string),
            parent_id: parent.map(str::to_string),
            role: RecordRole::Template,
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn record_set(records: Vec<RawRecord>) -> BTreeMap<String, RawRecord> {
        records.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    fn strs(items: &[&str]) -> Value {
        Value::Seq(items.iter().map(|s| Value::Str(s.to_string())).collect())
    }

    #[test]
    fn child_overrides_and_inherits() {
        let records = record_set(vec![
            record(
                "animal",
                Some("Monster"),
                None,
                vec![("health", Value::Int(30)), ("armor", Value::Int(1))],
            ),
            record("rat", None, Some("animal"), vec![("health", Value::Int(8))]),
        ]);
        let flat = flatten_all(&records).unwrap();
        let rat = &flat["rat"];
        assert_eq!(rat.class, "Monster");
        assert_eq!(rat.attrs["health"], Value::Int(8));
        assert_eq!(rat.attrs["armor"], Value::Int(1));
    }

    #[test]
    fn append_concatenates_in_chain_order() {
        let records = record_set(vec![
            record(
                "animal",
                Some("Monster"),
                None,
                vec![("strategies", strs(&["*wandering"]))],
            ),
            record(
                "rodent",
                None,
                Some("animal"),
                vec![("+strategies", strs(&["*flight-or-fight"]))],
            ),
            record(
                "rat",
                None,
                Some("rodent"),
                vec![("+strategies", strs(&["*pol_hater"]))],
            ),
        ]);
        let flat = flatten_all(&records).unwrap();
        assert_eq!(
            flat["rat"].attrs["strategies"],
            strs(&["*wandering", "*flight-or-fight", "*pol_hater"])
        );
        // middle of the chain only sees its own appends
        assert_eq!(
            flat["rodent"].attrs["strategies"],
            strs(&["*wandering", "*flight-or-fight"])
        );
    }

    #[test]
    fn append_without_ancestor_assigns() {
        let records = record_set(vec![record(
            "loner",
            Some("Monster"),
            None,
            vec![("+strategies", strs(&["*wandering"]))],
        )]);
        let flat = flatten_all(&records).unwrap();
        assert_eq!(flat["loner"].attrs["strategies"], strs(&["*wandering"]));
    }

    #[test]
    fn append_onto_non_sequence_is_malformed() {
        let records = record_set(vec![
            record("base", Some("Monster"), None, vec![("health", Value::Int(10))]),
            record(
                "odd",
                None,
                Some("base"),
                vec![("+health", strs(&["more"]))],
            ),
        ]);
        assert!(matches!(
            flatten_all(&records),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn inheritance_cycle_is_reported_with_path() {
        let records = record_set(vec![
            record("a", Some("Monster"), Some("b"), vec![]),
            record("b", None, Some("a"), vec![]),
        ]);
        let Err(LoadError::InheritanceCycle { path }) = flatten_all(&records) else {
            panic!("expected an inheritance cycle");
        };
        assert_eq!(path.first(), path.last());
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn unknown_parent_is_reported() {
        let records = record_set(vec![record("orphan", Some("Monster"), Some("ghost"), vec![])]);
        assert!(matches!(
            flatten_all(&records),
            Err(LoadError::UnknownParent { id, parent }) if id == "orphan" && parent == "ghost"
        ));
    }

    #[test]
    fn missing_class_everywhere_is_reported() {
        let records = record_set(vec![
            record("base", None, None, vec![("health", Value::Int(1))]),
            record("child", None, Some("base"), vec![]),
        ]);
        assert!(matches!(
            flatten_all(&records),
            Err(LoadError::MissingClass { .. })
        ));
    }
}
