//! A match scan detached from the session, so a host can run it off the UI thread.
//!
//! [`ToolSession::begin_scan`](crate::session::ToolSession::begin_scan) hands out a [`ScanJob`] carrying a
//! ticket. Starting another scan cancels the previous job's flag, and
//! [`ToolSession::finish_scan`](crate::session::ToolSession::finish_scan) discards results whose ticket is no
//! longer current.

use crate::error::BuildError;
use crate::field::{FieldRef, LayerId};
use crate::host::Feature;
use crate::matcher::{MatchResult, MatchSetBuilder};
use crate::operator::Operator;
use crate::reference::ReferenceValue;
use crate::util::CancelFlag;
use std::fmt::Display;

/// Generation number of a scan within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanTicket(pub(crate) u64);

impl Display for ScanTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "scan {}", self.0) }
}

#[derive(Debug, Clone)]
pub struct ScanJob {
    pub(crate) ticket: ScanTicket,
    pub(crate) layer: LayerId,
    pub(crate) field: FieldRef,
    pub(crate) operator: Operator,
    pub(crate) reference: ReferenceValue,
    pub(crate) cancel: CancelFlag,
}

impl ScanJob {
    pub fn ticket(&self) -> ScanTicket { self.ticket }
    pub fn layer(&self) -> &LayerId { &self.layer }
    pub fn reference(&self) -> &ReferenceValue { &self.reference }
    pub fn cancel_flag(&self) -> &CancelFlag { &self.cancel }
    pub fn is_cancelled(&self) -> bool { self.cancel.is_cancelled() }

    /// Scan synchronously on the calling thread
    pub fn run<I>(&self, features: I) -> Result<MatchResult, BuildError>
    where
        I: IntoIterator,
        I::Item: Feature,
    {
        MatchSetBuilder::new(&self.field, self.operator, &self.reference).with_cancel(&self.cancel).build(features)
    }
}

/// Run `job` on tokio's blocking pool and hand back its ticket with the outcome
pub async fn run_in_background<I>(job: ScanJob, features: I) -> (ScanTicket, Result<MatchResult, BuildError>)
where
    I: IntoIterator + Send + 'static,
    I::Item: Feature,
{
    let ticket = job.ticket;
    let result = match tokio::task::spawn_blocking(move || job.run(features)).await {
        Ok(result) => result,
        Err(e) => Err(BuildError::Worker(e.to_string())),
    };
    (ticket, result)
}
