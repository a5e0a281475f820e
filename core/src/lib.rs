pub mod error;
pub mod field;
pub mod host;
pub mod matcher;
pub mod notice;
pub mod operator;
pub mod reference;
pub mod scan;
pub mod session;
pub mod settings;
pub mod util;
pub mod value;

pub use error::{ErrorKind, SessionError};
pub use field::{FeatureId, FieldRef, LayerId, Target};
pub use matcher::{MatchResult, MatchSetBuilder};
pub use operator::{evaluate, MatchDecision, Operator};
pub use reference::{extract, ReferenceValue};
pub use session::{Mode, SessionState, SessionStatus, ToolId, ToolSession};
pub use value::{FieldType, Value};

pub use matchql;

#[cfg(test)]
#[ctor::ctor]
fn init_test_tracing() { tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().init(); }
