//! Reference resolution and object materialization.
//!
//! The two are interleaved: resolving a `*id` token requires running the
//! whole pipeline for the target record to produce a fresh clone, and
//! resolving a `#id` token may lazily materialize the target singleton. One
//! in-progress id stack covers both policies, so any chain of references
//! that revisits an id still being built is reported as a cycle instead of
//! recursing forever.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use codex_core::{ObjectClass, ResolvedValue, WorldObject};

use crate::error::LoadError;
use crate::prototypes::FlatRecord;
use crate::records::{RefPolicy, Value};
use crate::world::Registry;

/// Where shared singletons live during resolution.
///
/// During the initial load the registry is under construction and lazily
/// materialized singletons are inserted into it. After the world is sealed,
/// `World::invoke` still needs shared lookups; those hit the finished
/// registry, with a private overlay for template singletons that were never
/// pulled in during the load (shared within that invocation only).
pub(crate) enum SharedStore<'a> {
    Building(&'a mut Registry),
    Sealed {
        registry: &'a Registry,
        overlay: BTreeMap<String, Arc<WorldObject>>,
    },
}

impl SharedStore<'_> {
    fn get(&self, id: &str) -> Option<Arc<WorldObject>> {
        match self {
            Self::Building(registry) => registry.get(id),
            Self::Sealed { registry, overlay } => {
                registry.get(id).or_else(|| overlay.get(id).cloned())
            }
        }
    }

    fn insert(&mut self, id: String, object: Arc<WorldObject>) {
        match self {
            Self::Building(registry) => registry.insert(id, object),
            Self::Sealed { overlay, .. } => {
                overlay.insert(id, object);
            }
        }
    }
}

/// Depth-first materializer over flattened records.
pub(crate) struct Materializer<'a> {
    records: &'a BTreeMap<String, FlatRecord>,
    store: SharedStore<'a>,
    /// Ids whose materialization is in progress, for cycle detection.
    stack: Vec<String>,
    /// Process-wide clone-id serial.
    serial: &'a AtomicU64,
}

impl<'a> Materializer<'a> {
    pub(crate) fn new(
        records: &'a BTreeMap<String, FlatRecord>,
        store: SharedStore<'a>,
        serial: &'a AtomicU64,
    ) -> Self {
        Self {
            records,
            store,
            stack: Vec::new(),
            serial,
        }
    }

    /// Resolves a `#id` reference: returns the registered singleton,
    /// materializing and registering it on first use. Registration is
    /// idempotent no matter how many sites refer to the id.
    pub(crate) fn materialize_shared(
        &mut self,
        target: &str,
    ) -> Result<Arc<WorldObject>, LoadError> {
        if let Some(existing) = self.store.get(target) {
            return Ok(existing);
        }
        self.enter(target)?;
        let built = self.construct(target, target.to_string());
        self.stack.pop();
        let object = Arc::new(built?);
        tracing::debug!("registered singleton `{target}`");
        self.store.insert(target.to_string(), Arc::clone(&object));
        Ok(object)
    }

    /// Resolves a `*id` reference: runs the full pipeline for the target
    /// record and returns a fresh, independently-owned object with a
    /// generated clone id. Never cached, never registered.
    pub(crate) fn materialize_owned(&mut self, target: &str) -> Result<WorldObject, LoadError> {
        self.enter(target)?;
        let serial = self.serial.fetch_add(1, Ordering::Relaxed) + 1;
        let built = self.construct(target, format!("{target}#{serial}"));
        self.stack.pop();
        built
    }

    fn enter(&mut self, target: &str) -> Result<(), LoadError> {
        if let Some(pos) = self.stack.iter().position(|id| id == target) {
            let mut path = self.stack[pos..].to_vec();
            path.push(target.to_string());
            return Err(LoadError::ReferenceCycle { path });
        }
        self.stack.push(target.to_string());
        Ok(())
    }

    fn construct(&mut self, target: &str, object_id: String) -> Result<WorldObject, LoadError> {
        let records = self.records;
        let Some(record) = records.get(target) else {
            return Err(LoadError::UnresolvedReference {
                target: target.to_string(),
            });
        };

        let mut attrs = BTreeMap::new();
        for (key, value) in &record.attrs {
            attrs.insert(key.clone(), self.resolve_value(value)?);
        }

        let class = ObjectClass::from_str(&record.class).map_err(|_| LoadError::UnknownClass {
            id: record.id.clone(),
            class: record.class.clone(),
        })?;
        WorldObject::build(class, object_id, attrs).map_err(|source| LoadError::InvalidField {
            id: record.id.clone(),
            source,
        })
    }

    fn resolve_value(&mut self, value: &Value) -> Result<ResolvedValue, LoadError> {
        Ok(match value {
            Value::Str(s) => ResolvedValue::Str(s.clone()),
            Value::Int(n) => ResolvedValue::Int(*n),
            Value::Float(x) => ResolvedValue::Float(*x),
            Value::Bool(b) => ResolvedValue::Bool(*b),
            Value::Seq(items) => ResolvedValue::Seq(
                items
                    .iter()
                    .map(|item| self.resolve_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut resolved = BTreeMap::new();
                for (key, entry) in entries {
                    resolved.insert(key.clone(), self.resolve_value(entry)?);
                }
                ResolvedValue::Map(resolved)
            }
            Value::Ref(token) => match token.policy {
                RefPolicy::Shared => {
                    ResolvedValue::Shared(self.materialize_shared(&token.target)?)
                }
                RefPolicy::Clone => {
                    ResolvedValue::Owned(Box::new(self.materialize_owned(&token.target)?))
                }
            },
        })
    }
}
