#![allow(unused)]
use featurematch::core::host::memory::{FixedClicks, MemoryFeature, MemoryStore, RecordingSink};
use featurematch::core::host::{Feature, FeatureRecord, ScreenPoint};
use featurematch::{FeatureId, FieldRef, FieldType, LayerId, MatchResult, ToolSession, Value};
use std::collections::BTreeSet;
use tracing::Level;

pub type Session = ToolSession<MemoryStore, FixedClicks, RecordingSink>;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() { tracing_subscriber::fmt().with_max_level(Level::DEBUG).with_test_writer().init(); }

/// A host with one layer, where feature `n` can be clicked at `point(n)`
pub struct Fixture {
    pub store: MemoryStore,
    pub clicks: FixedClicks,
    pub sink: RecordingSink,
    pub layer: LayerId,
}

impl Fixture {
    pub fn new(layer: &str, schema: Vec<(&'static str, FieldType)>, features: Vec<MemoryFeature>) -> anyhow::Result<Self> {
        let store = MemoryStore::new();
        let clicks = FixedClicks::new(&store);
        let fixture = Self { layer: LayerId::from(layer), store, clicks, sink: RecordingSink::new() };
        fixture.add_layer(layer, schema, features)?;
        Ok(fixture)
    }

    /// Add a layer to the same host
    pub fn add_layer(&self, layer: &str, schema: Vec<(&'static str, FieldType)>, features: Vec<MemoryFeature>) -> anyhow::Result<LayerId> {
        let layer = self.store.add_layer(layer, schema);
        for feature in features {
            let id = feature.id();
            self.clicks.place(&layer, point(id.0), id);
            self.store.add_feature(&layer, feature)?;
        }
        Ok(layer)
    }

    pub fn session(&self) -> Session { ToolSession::new(self.store.clone(), self.clicks.clone(), self.sink.clone()) }

    pub fn selection(&self) -> BTreeSet<FeatureId> { self.store.selection(&self.layer) }
    pub fn filter(&self) -> Option<String> { self.store.filter(&self.layer) }
}

/// {1: "A", 2: "B", 3: "A"}
pub fn names() -> anyhow::Result<Fixture> {
    Fixture::new(
        "roads",
        vec![("name", FieldType::Text)],
        vec![MemoryFeature::new(1).with("name", "A"), MemoryFeature::new(2).with("name", "B"), MemoryFeature::new(3).with("name", "A")],
    )
}

/// {1: 10, 2: 20, 3: NULL, 4: 30}
pub fn lanes() -> anyhow::Result<Fixture> {
    Fixture::new(
        "roads",
        vec![("lanes", FieldType::Integer)],
        vec![
            MemoryFeature::new(1).with("lanes", 10i64),
            MemoryFeature::new(2).with("lanes", 20i64),
            MemoryFeature::new(3).with("lanes", Value::Null),
            MemoryFeature::new(4).with("lanes", 30i64),
        ],
    )
}

pub fn name_field() -> FieldRef { FieldRef::new("name", FieldType::Text) }
pub fn lanes_field() -> FieldRef { FieldRef::new("lanes", FieldType::Integer) }

pub fn point(id: i64) -> ScreenPoint { ScreenPoint::new(id as i32 * 10, id as i32 * 10) }

pub fn ids(ids: &[i64]) -> BTreeSet<FeatureId> { ids.iter().copied().map(FeatureId).collect() }

/// Ids of `features` the match's filter expression lets through, evaluated by the expression language
pub fn expression_matches(result: &MatchResult, features: &[MemoryFeature]) -> anyhow::Result<BTreeSet<FeatureId>> {
    let predicate = matchql::parse_selection(result.expression())?;
    Ok(features
        .iter()
        .filter(|f| matchql::selection::filter::evaluate_predicate(&FeatureRecord(*f), &predicate).unwrap_or(false))
        .map(|f| f.id())
        .collect())
}
