//! # featurematch
//!
//! Click-to-match attribute selection for map editors. The user picks a layer and a field, clicks one
//! reference feature, and every feature of the layer whose value in that field compares true against the
//! reference is either selected or shown through a display filter.
//!
//! ## Core Concepts
//!
//! - **Target**: the layer, the typed field and the comparison [`Operator`]
//! - **Reference value**: the typed value read from the clicked feature
//! - **Match result**: the matching feature ids, plus an equivalent filter expression rendered with [`matchql`]
//! - **Session**: a [`ToolSession`] state machine, Inactive → Armed → Engaged, that applies matches in
//!   [`Mode::Select`] or [`Mode::Filter`] through the host's [`FeatureStore`](core::host::FeatureStore)
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use featurematch::core::host::memory::{FixedClicks, MemoryFeature, MemoryStore, RecordingSink};
//! use featurematch::core::host::ScreenPoint;
//! use featurematch::{FeatureId, FieldRef, FieldType, Operator, ToolSession};
//!
//! let store = MemoryStore::new();
//! let roads = store.add_layer("roads", [("name", FieldType::Text)]);
//! store.add_feature(&roads, MemoryFeature::new(1).with("name", "A"))?;
//! store.add_feature(&roads, MemoryFeature::new(2).with("name", "B"))?;
//! store.add_feature(&roads, MemoryFeature::new(3).with("name", "A"))?;
//!
//! let clicks = FixedClicks::new(&store);
//! clicks.place(&roads, ScreenPoint::new(10, 10), FeatureId(1));
//!
//! let mut session = ToolSession::new(store.clone(), clicks, RecordingSink::new());
//! session.set_target(roads.clone(), FieldRef::new("name", FieldType::Text), Operator::Equal)?;
//! session.activate();
//! session.click(ScreenPoint::new(10, 10))?;
//!
//! assert_eq!(store.selection(&roads), [FeatureId(1), FeatureId(3)].into_iter().collect());
//! # Ok(())
//! # }
//! ```

pub use featurematch_core as core;
pub use matchql;

pub use featurematch_core::{
    error, evaluate, extract, field, host, matcher, notice, operator, reference, scan, session, settings, value, ErrorKind, FeatureId,
    FieldRef, FieldType, LayerId, MatchResult, Mode, Operator, ReferenceValue, SessionError, SessionState, SessionStatus, Target,
    ToolId, ToolSession, Value,
};
