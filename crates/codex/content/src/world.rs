//! The finished, queryable object graph.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use codex_core::{ObjectClass, Sentiment, SentimentChart, WorldObject};

use crate::error::LoadError;
use crate::prototypes::FlatRecord;
use crate::resolve::{Materializer, SharedStore};

/// Registry of shared singleton objects, keyed by declared id.
///
/// Registration order is preserved so enumeration stays deterministic.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    objects: BTreeMap<String, Arc<WorldObject>>,
    order: Vec<String>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<WorldObject>> {
        self.objects.get(id).cloned()
    }

    pub(crate) fn insert(&mut self, id: String, object: Arc<WorldObject>) {
        if self.objects.insert(id.clone(), object).is_none() {
            self.order.push(id);
        }
    }

    /// Objects in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<WorldObject>> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }
}

/// A fully loaded world: the singleton registry, the faction sentiment
/// relation, and the retained blueprints for post-load template invocation.
///
/// Built by [`crate::WorldLoader::build`] and handed to the caller by value;
/// there is no ambient global state. The graph is read-only after build:
/// every query takes `&self`, shared singletons are `Arc`s safe to read from
/// multiple threads, and [`World::invoke`] hands each produced clone to the
/// caller by value.
#[derive(Debug)]
pub struct World {
    registry: Registry,
    /// Ids of eagerly declared instances, in declaration order.
    instance_order: Vec<String>,
    /// Flattened records kept for [`World::invoke`].
    blueprints: BTreeMap<String, FlatRecord>,
    chart: SentimentChart,
    /// Clone-id serial, continued from the load phase.
    clone_serial: AtomicU64,
}

impl World {
    pub(crate) fn new(
        registry: Registry,
        instance_order: Vec<String>,
        blueprints: BTreeMap<String, FlatRecord>,
        chart: SentimentChart,
        clone_serial: AtomicU64,
    ) -> Self {
        Self {
            registry,
            instance_order,
            blueprints,
            chart,
            clone_serial,
        }
    }

    /// Shared lookup by id. An absent id is a recoverable `None`, the only
    /// non-fatal miss in the engine.
    pub fn get(&self, id: &str) -> Option<Arc<WorldObject>> {
        self.registry.get(id)
    }

    /// Eagerly declared instances whose effective class is `class`, in
    /// declaration order.
    pub fn instances_of_class(&self, class: ObjectClass) -> Vec<Arc<WorldObject>> {
        self.instance_order
            .iter()
            .filter_map(|id| self.registry.get(id))
            .filter(|object| object.class == class)
            .collect()
    }

    /// How faction `a` feels about faction `b`, by faction-tag name.
    pub fn sentiment(&self, a: &str, b: &str) -> Sentiment {
        self.chart.sentiment(a, b)
    }

    /// The full sentiment relation.
    pub fn chart(&self) -> &SentimentChart {
        &self.chart
    }

    /// Materializes a fresh owned clone of any known record id: the public
    /// form of a `*id` reference. Shared references inside the clone resolve
    /// against the sealed registry.
    pub fn invoke(&self, template_id: &str) -> Result<WorldObject, LoadError> {
        let store = SharedStore::Sealed {
            registry: &self.registry,
            overlay: BTreeMap::new(),
        };
        Materializer::new(&self.blueprints, store, &self.clone_serial)
            .materialize_owned(template_id)
    }

    /// Registered singleton ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(|object| object.id.as_str())
    }

    /// Every registered singleton, in registration order.
    pub fn objects(&self) -> impl Iterator<Item = &Arc<WorldObject>> {
        self.registry.iter()
    }

    /// Number of registered singletons (built-in families included).
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }
}
