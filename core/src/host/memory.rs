//! In-memory host: a feature store with per-layer selection and filter state, a click source with
//! pre-placed hit points, and a notification sink that records what it receives.

use super::{Feature, FeatureRecord, FeatureStore, MapClickSource, NotificationSink, ScreenPoint};
use crate::error::StoreError;
use crate::field::{FeatureId, LayerId};
use crate::notice::Notice;
use crate::value::{FieldType, Value};
use matchql::selection::filter::{FilterIterator, FilterResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFeature {
    id: FeatureId,
    attributes: BTreeMap<String, Value>,
}

impl MemoryFeature {
    pub fn new(id: i64) -> Self { Self { id: FeatureId(id), attributes: BTreeMap::new() } }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }
}

impl Feature for MemoryFeature {
    fn id(&self) -> FeatureId { self.id }
    fn attribute(&self, field: &str) -> Option<Value> { self.attributes.get(field).cloned() }
}

#[derive(Default)]
struct MemoryLayer {
    schema: BTreeMap<String, FieldType>,
    features: Vec<MemoryFeature>,
    editing: bool,
    selection: BTreeSet<FeatureId>,
    filter: Option<String>,
}

/// Requests the store should refuse, for exercising failure paths
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub select: bool,
    pub install_filter: bool,
    pub clear: bool,
}

#[derive(Default)]
struct Inner {
    layers: BTreeMap<LayerId, MemoryLayer>,
    faults: Faults,
}

/// Cheaply clonable handle; clones share the same layers
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<RwLock<Inner>>);

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    fn read(&self) -> RwLockReadGuard<'_, Inner> { self.0.read().unwrap_or_else(PoisonError::into_inner) }
    fn write(&self) -> RwLockWriteGuard<'_, Inner> { self.0.write().unwrap_or_else(PoisonError::into_inner) }

    pub fn add_layer(&self, layer: impl Into<LayerId>, schema: impl IntoIterator<Item = (&'static str, FieldType)>) -> LayerId {
        let layer = layer.into();
        let schema = schema.into_iter().map(|(name, ty)| (name.to_string(), ty)).collect();
        self.write().layers.insert(layer.clone(), MemoryLayer { schema, ..Default::default() });
        layer
    }

    pub fn add_feature(&self, layer: &LayerId, feature: MemoryFeature) -> Result<(), StoreError> {
        self.with_layer_mut(layer, |l| l.features.push(feature))
    }

    /// Overwrite one attribute of a stored feature
    pub fn set_attribute(&self, layer: &LayerId, id: FeatureId, field: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let value = value.into();
        self.with_layer_mut(layer, |l| {
            if let Some(feature) = l.features.iter_mut().find(|f| f.id == id) {
                feature.attributes.insert(field.to_string(), value);
            }
        })
    }

    pub fn set_editing(&self, layer: &LayerId, editing: bool) -> Result<(), StoreError> { self.with_layer_mut(layer, |l| l.editing = editing) }

    pub fn set_faults(&self, faults: Faults) { self.write().faults = faults; }

    pub fn feature(&self, layer: &LayerId, id: FeatureId) -> Option<MemoryFeature> {
        self.read().layers.get(layer)?.features.iter().find(|f| f.id == id).cloned()
    }

    pub fn selection(&self, layer: &LayerId) -> BTreeSet<FeatureId> {
        self.read().layers.get(layer).map(|l| l.selection.clone()).unwrap_or_default()
    }

    /// The installed display predicate; `None` means every feature is shown
    pub fn filter(&self, layer: &LayerId) -> Option<String> { self.read().layers.get(layer).and_then(|l| l.filter.clone()) }

    /// Features the installed filter lets through, evaluated the way a host evaluates its subset string.
    /// Rows the filter cannot evaluate are hidden.
    pub fn visible(&self, layer: &LayerId) -> Result<BTreeSet<FeatureId>, StoreError> {
        let inner = self.read();
        let l = inner.layers.get(layer).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))?;
        let Some(expression) = &l.filter else {
            return Ok(l.features.iter().map(|f| f.id).collect());
        };
        let predicate = matchql::parse_selection(expression).map_err(|e| StoreError::Rejected(e.to_string()))?;
        Ok(FilterIterator::new(l.features.iter().map(FeatureRecord), predicate)
            .filter_map(|result| match result {
                FilterResult::Pass(record) => Some(record.0.id),
                _ => None,
            })
            .collect())
    }

    fn with_layer_mut<T>(&self, layer: &LayerId, f: impl FnOnce(&mut MemoryLayer) -> T) -> Result<T, StoreError> {
        let mut inner = self.write();
        let l = inner.layers.get_mut(layer).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))?;
        Ok(f(l))
    }
}

impl FeatureStore for MemoryStore {
    type Feature = MemoryFeature;
    type Features<'a> = std::vec::IntoIter<MemoryFeature>;

    fn features(&self, layer: &LayerId) -> Result<Self::Features<'_>, StoreError> {
        let inner = self.read();
        let l = inner.layers.get(layer).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))?;
        Ok(l.features.clone().into_iter())
    }

    fn field_type(&self, layer: &LayerId, field: &str) -> Result<Option<FieldType>, StoreError> {
        let inner = self.read();
        let l = inner.layers.get(layer).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))?;
        Ok(l.schema.get(field).copied())
    }

    fn is_editing(&self, layer: &LayerId) -> Result<bool, StoreError> {
        self.read().layers.get(layer).map(|l| l.editing).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))
    }

    fn select(&self, layer: &LayerId, ids: &BTreeSet<FeatureId>) -> Result<(), StoreError> {
        if self.read().faults.select {
            return Err(StoreError::Rejected("selection refused".to_string()));
        }
        self.with_layer_mut(layer, |l| l.selection = ids.clone())
    }

    fn clear_selection(&self, layer: &LayerId) -> Result<(), StoreError> {
        if self.read().faults.clear {
            return Err(StoreError::Rejected("clear refused".to_string()));
        }
        self.with_layer_mut(layer, |l| l.selection.clear())
    }

    fn install_filter(&self, layer: &LayerId, expression: &str) -> Result<(), StoreError> {
        if self.read().faults.install_filter {
            return Err(StoreError::Rejected("filter refused".to_string()));
        }
        matchql::parse_selection(expression).map_err(|e| StoreError::Rejected(e.to_string()))?;
        let mut inner = self.write();
        let l = inner.layers.get_mut(layer).ok_or_else(|| StoreError::LayerNotFound(layer.clone()))?;
        if l.editing {
            return Err(StoreError::EditSessionActive(layer.clone()));
        }
        l.filter = Some(expression.to_string());
        Ok(())
    }

    fn clear_filter(&self, layer: &LayerId) -> Result<(), StoreError> {
        if self.read().faults.clear {
            return Err(StoreError::Rejected("clear refused".to_string()));
        }
        self.with_layer_mut(layer, |l| l.filter = None)
    }
}

/// Click source with hit points placed by hand. A hit resolves to the stored feature as it is at click time.
#[derive(Clone)]
pub struct FixedClicks {
    store: MemoryStore,
    points: Arc<RwLock<HashMap<(LayerId, ScreenPoint), FeatureId>>>,
}

impl FixedClicks {
    pub fn new(store: &MemoryStore) -> Self { Self { store: store.clone(), points: Default::default() } }

    pub fn place(&self, layer: &LayerId, point: ScreenPoint, id: FeatureId) {
        self.points.write().unwrap_or_else(PoisonError::into_inner).insert((layer.clone(), point), id);
    }
}

impl MapClickSource for FixedClicks {
    type Feature = MemoryFeature;

    fn resolve(&self, layer: &LayerId, point: ScreenPoint) -> Option<MemoryFeature> {
        let id = *self.points.read().unwrap_or_else(PoisonError::into_inner).get(&(layer.clone(), point))?;
        self.store.feature(layer, id)
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink(Arc<RwLock<Vec<Notice>>>);

impl RecordingSink {
    pub fn new() -> Self { Self::default() }
    pub fn notices(&self) -> Vec<Notice> { self.0.read().unwrap_or_else(PoisonError::into_inner).clone() }
    pub fn last(&self) -> Option<Notice> { self.0.read().unwrap_or_else(PoisonError::into_inner).last().cloned() }
    pub fn take(&self) -> Vec<Notice> { std::mem::take(&mut *self.0.write().unwrap_or_else(PoisonError::into_inner)) }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        tracing::debug!("notice: {}", notice);
        self.0.write().unwrap_or_else(PoisonError::into_inner).push(notice);
    }
}
