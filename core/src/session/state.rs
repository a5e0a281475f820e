use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Not listening for clicks, nothing applied
    Inactive,
    /// Listening for clicks, no reference chosen
    Armed,
    /// A match is computed and applied to the target layer
    Engaged,
}

/// How a match is applied to the layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Filter,
}

/// Snapshot published to panels through the status signal
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub mode: Mode,
    pub match_count: Option<usize>,
    pub skipped_count: usize,
    pub last_error: Option<ErrorKind>,
}

impl Default for SessionStatus {
    fn default() -> Self { Self { state: SessionState::Inactive, mode: Mode::Select, match_count: None, skipped_count: 0, last_error: None } }
}

/// Identity of an interactive map tool, used to recognise foreign tool activations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(u64);

impl ToolId {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ToolId {
    fn default() -> Self { Self::new() }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "tool {}", self.0) }
}
