use crate::error::ErrorKind;
use crate::field::LayerId;
use crate::operator::Operator;
use crate::session::Mode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Message-bar severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// Structured payload handed to the notification sink. Hosts turn these into user-facing text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    Matched { layer: LayerId, field: String, operator: Operator, reference: String, count: usize, skipped: usize, mode: Mode },
    Cleared { layer: LayerId },
    Deactivated,
    NoFeatureAtPoint { layer: LayerId },
    Failed { kind: ErrorKind, detail: String },
}

impl Notice {
    pub fn level(&self) -> Level {
        match self {
            Notice::Matched { count: 0, .. } | Notice::Matched { skipped: 1.., .. } => Level::Warning,
            Notice::Matched { .. } => Level::Success,
            Notice::Cleared { .. } | Notice::Deactivated => Level::Info,
            Notice::NoFeatureAtPoint { .. } => Level::Warning,
            Notice::Failed { kind, .. } => match kind {
                ErrorKind::EditSessionActive | ErrorKind::HostApplyFailure | ErrorKind::ScanFailed | ErrorKind::Expression => Level::Error,
                ErrorKind::Configuration | ErrorKind::Extraction | ErrorKind::NoTarget | ErrorKind::Inactive => Level::Warning,
                ErrorKind::Cancelled => Level::Info,
            },
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Matched { count: 0, field, operator, reference, .. } => write!(f, "no matching features for {} {} {}", field, operator, reference),
            Notice::Matched { layer, field, operator, reference, count, skipped, mode } => {
                write!(f, "{} features on {} where {} {} {} ({:?})", count, layer, field, operator, reference, mode)?;
                if *skipped > 0 {
                    write!(f, ", {} skipped", skipped)?;
                }
                Ok(())
            }
            Notice::Cleared { layer } => write!(f, "cleared matches on {}", layer),
            Notice::Deactivated => f.write_str("match tool deactivated"),
            Notice::NoFeatureAtPoint { layer } => write!(f, "no feature of {} at the clicked point", layer),
            Notice::Failed { kind, detail } => write!(f, "{}: {}", kind, detail),
        }
    }
}
