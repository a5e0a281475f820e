//! Interfaces to the host editor: feature storage, map hit-testing and user notification.

#[cfg(any(test, feature = "memory"))]
pub mod memory;

use crate::error::StoreError;
use crate::field::{FeatureId, LayerId};
use crate::notice::Notice;
use crate::value::{FieldType, Value};
use matchql::ast::Literal;
use matchql::selection::filter::Filterable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One feature of a layer, with attribute access by field name
pub trait Feature {
    fn id(&self) -> FeatureId;
    /// `None` when the feature's schema has no such field, `Some(Value::Null)` when the field is empty
    fn attribute(&self, field: &str) -> Option<Value>;
}

impl<F: Feature + ?Sized> Feature for &F {
    fn id(&self) -> FeatureId { (**self).id() }
    fn attribute(&self, field: &str) -> Option<Value> { (**self).attribute(field) }
}

/// Exposes a feature to the filter-expression evaluator
pub struct FeatureRecord<'a, F: ?Sized>(pub &'a F);

impl<F: Feature + ?Sized> Filterable for FeatureRecord<'_, F> {
    fn value(&self, name: &str) -> Option<Literal> { self.0.attribute(name).map(Literal::from) }
}

/// The host's feature iteration and layer mutation engine.
///
/// Every mutating call returns a typed result; the session never treats a mutation as fire-and-forget.
pub trait FeatureStore {
    type Feature: Feature;
    type Features<'a>: Iterator<Item = Self::Feature>
    where Self: 'a;

    fn features(&self, layer: &LayerId) -> Result<Self::Features<'_>, StoreError>;
    /// Declared type of a field, `None` if the layer's schema lacks it
    fn field_type(&self, layer: &LayerId, field: &str) -> Result<Option<FieldType>, StoreError>;
    fn is_editing(&self, layer: &LayerId) -> Result<bool, StoreError>;

    /// Replace the layer's selection with exactly `ids`
    fn select(&self, layer: &LayerId, ids: &BTreeSet<FeatureId>) -> Result<(), StoreError>;
    fn clear_selection(&self, layer: &LayerId) -> Result<(), StoreError>;
    /// Install `expression` as the layer's display predicate. Fails with `EditSessionActive` while the layer is being edited.
    fn install_filter(&self, layer: &LayerId, expression: &str) -> Result<(), StoreError>;
    fn clear_filter(&self, layer: &LayerId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

/// Resolves a map click to at most one feature of the target layer
pub trait MapClickSource {
    type Feature: Feature;
    fn resolve(&self, layer: &LayerId, point: ScreenPoint) -> Option<Self::Feature>;
}

pub trait NotificationSink {
    fn notify(&self, notice: Notice);
}

impl<N: NotificationSink + ?Sized> NotificationSink for Arc<N> {
    fn notify(&self, notice: Notice) { (**self).notify(notice) }
}

impl<N: NotificationSink + ?Sized> NotificationSink for &N {
    fn notify(&self, notice: Notice) { (**self).notify(notice) }
}
