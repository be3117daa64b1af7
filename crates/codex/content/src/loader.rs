//! Load orchestration: files in, a finished [`World`] out.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use codex_core::{
    BUILTIN_FAMILIES, BuildError, ObjectClass, ObjectKind, SentimentChartBuilder, WorldObject,
};

use crate::error::LoadError;
use crate::records::{self, RawRecord, RecordRole};
use crate::resolve::{Materializer, SharedStore};
use crate::world::{Registry, World};
use crate::prototypes;

/// Accumulates definition files, then builds the resolved world in one shot.
///
/// The `load_*` calls only parse and index records; flattening,
/// materialization, and the sentiment build all happen in
/// [`WorldLoader::build`], so references forward across files resolve
/// uniformly regardless of load order. If any stage fails the whole load is
/// rejected; the under-construction registry is dropped, never published.
#[derive(Debug, Default)]
pub struct WorldLoader {
    records: BTreeMap<String, RawRecord>,
    declaration_order: Vec<String>,
    files: usize,
}

impl WorldLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one RevengateFile document and indexes its records.
    pub fn load_str(&mut self, text: &str) -> Result<(), LoadError> {
        let parsed = records::parse_str(text)?;
        tracing::info!(
            "parsed {} records{}",
            parsed.records.len(),
            parsed
                .description
                .as_deref()
                .map(|d| format!(" ({d})"))
                .unwrap_or_default()
        );
        for record in parsed.records {
            self.index(record)?;
        }
        self.files += 1;
        Ok(())
    }

    /// Loads one definition file.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        tracing::debug!("loading {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Loads every `*.toml` file directly under `dir`, in lexical order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), LoadError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();
        for path in &paths {
            self.load_path(path)?;
        }
        Ok(())
    }

    fn index(&mut self, record: RawRecord) -> Result<(), LoadError> {
        if self.records.contains_key(&record.id)
            || BUILTIN_FAMILIES.contains(&record.id.as_str())
        {
            return Err(LoadError::DuplicateId { id: record.id });
        }
        self.declaration_order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Runs the whole pipeline: flatten, materialize every declared
    /// instance, and assemble the sentiment chart.
    pub fn build(self) -> Result<World, LoadError> {
        let flattened = prototypes::flatten_all(&self.records)?;

        let mut registry = Registry::new();
        for family in BUILTIN_FAMILIES {
            let object = WorldObject::build(ObjectClass::Family, family, BTreeMap::new())
                .map_err(|source| LoadError::InvalidField {
                    id: family.to_string(),
                    source,
                })?;
            registry.insert(family.to_string(), Arc::new(object));
        }

        let clone_serial = AtomicU64::new(0);
        let mut instance_order = Vec::new();
        let mut materializer = Materializer::new(
            &flattened,
            SharedStore::Building(&mut registry),
            &clone_serial,
        );
        for id in &self.declaration_order {
            let Some(record) = flattened.get(id) else {
                continue;
            };
            if record.role == RecordRole::Instance {
                materializer.materialize_shared(id)?;
                instance_order.push(id.clone());
            }
        }
        drop(materializer);

        // every materialized chart contributes to one merged relation
        let faction_names: BTreeSet<&str> = registry
            .iter()
            .filter(|object| object.class == ObjectClass::FactionTag)
            .map(|object| object.name())
            .collect();
        let mut builder = SentimentChartBuilder::new();
        for object in registry.iter() {
            let ObjectKind::Chart(spec) = &object.kind else {
                continue;
            };
            for (a, b) in &spec.mutual_pos {
                builder.mutual_pos(a.name(), b.name());
            }
            for (a, b) in &spec.mutual_neg {
                builder.mutual_neg(a.name(), b.name());
            }
            for (feeler, targets) in &spec.onesided_neg {
                // the value side resolved through `#` references, but the
                // feeler is a plain mapping key; reject names no
                // materialized faction answers to
                if !faction_names.contains(feeler.as_str()) {
                    return Err(LoadError::InvalidField {
                        id: object.id.clone(),
                        source: BuildError::invalid(
                            "onesided_neg",
                            format!("feeler `{feeler}` does not name a known FactionTag"),
                        ),
                    });
                }
                for target in targets {
                    builder.onesided_neg(feeler, target.name());
                }
            }
        }
        let chart = builder.build()?;

        tracing::info!(
            "world built: {} files, {} records, {} singletons",
            self.files,
            flattened.len(),
            registry.len()
        );
        Ok(World::new(
            registry,
            instance_order,
            flattened,
            chart,
            clone_serial,
        ))
    }
}
