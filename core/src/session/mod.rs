//! The pick-tool session: activation, the current reference and match, and how the match is applied
//! to the target layer.
//!
//! ```text
//! Inactive --activate--> Armed --click--> Engaged --click/set_mode/set_operator--> Engaged
//!     ^                    ^                  |
//!     |                    +-- clear/target --+
//!     +---- deactivate / interrupt (any state)
//! ```

mod state;

pub use state::{Mode, SessionState, SessionStatus, ToolId};

use crate::error::{BuildError, ConfigurationError, ErrorKind, SessionError, StoreError};
use crate::field::{FieldRef, LayerId, Target};
use crate::host::{Feature, FeatureStore, MapClickSource, NotificationSink, ScreenPoint};
use crate::matcher::{MatchResult, MatchSetBuilder};
use crate::notice::Notice;
use crate::operator::Operator;
use crate::reference::{extract, ReferenceValue};
use crate::scan::{ScanJob, ScanTicket};
use crate::settings::ToolSettings;
use crate::util::CancelFlag;
use crate::{action_debug, action_info, action_warn};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use std::fmt::Display;

/// One interactive matching session over a host's feature store.
///
/// The session is the only writer of the target layer's selection and filter while it is Armed or Engaged.
/// Every host mutation it performs is checked; failures surface as a [`SessionError`], a `Failed` notice and
/// the `last_error` of the published status.
pub struct ToolSession<S: FeatureStore, C: MapClickSource, N: NotificationSink> {
    tool: ToolId,
    store: S,
    clicks: C,
    sink: N,
    state: SessionState,
    mode: Mode,
    target: Option<Target>,
    matches: Option<MatchResult>,
    /// Effect currently installed on the target layer
    applied: Option<Mode>,
    in_flight: Option<(ScanTicket, CancelFlag)>,
    next_ticket: u64,
    last_error: Option<ErrorKind>,
    status: Mutable<SessionStatus>,
}

impl<S: FeatureStore, C: MapClickSource, N: NotificationSink> ToolSession<S, C, N> {
    pub fn new(store: S, clicks: C, sink: N) -> Self { Self::with_tool_id(ToolId::new(), store, clicks, sink) }

    pub fn with_tool_id(tool: ToolId, store: S, clicks: C, sink: N) -> Self {
        Self {
            tool,
            store,
            clicks,
            sink,
            state: SessionState::Inactive,
            mode: Mode::Select,
            target: None,
            matches: None,
            applied: None,
            in_flight: None,
            next_ticket: 0,
            last_error: None,
            status: Mutable::new(SessionStatus::default()),
        }
    }

    pub fn tool_id(&self) -> ToolId { self.tool }
    pub fn state(&self) -> SessionState { self.state }
    pub fn mode(&self) -> Mode { self.mode }
    pub fn target(&self) -> Option<&Target> { self.target.as_ref() }
    pub fn matches(&self) -> Option<&MatchResult> { self.matches.as_ref() }
    /// The live reference value and its source feature, for highlighting
    pub fn reference(&self) -> Option<&ReferenceValue> { self.matches.as_ref().map(MatchResult::reference) }
    pub fn applied(&self) -> Option<Mode> { self.applied }
    pub fn last_error(&self) -> Option<ErrorKind> { self.last_error }
    pub fn store(&self) -> &S { &self.store }

    pub fn status(&self) -> SessionStatus { self.status.get_cloned() }

    /// Changes of `(state, mode, match count, skipped count, last error)`
    pub fn status_signal(&self) -> MutableSignalCloned<SessionStatus> { self.status.signal_cloned() }

    /// Start listening for clicks. No effect unless Inactive.
    pub fn activate(&mut self) {
        if self.state != SessionState::Inactive {
            return;
        }
        self.state = SessionState::Armed;
        self.last_error = None;
        action_info!(self, "activated");
        self.publish();
    }

    /// Stop listening and remove whatever this session applied. Always ends Inactive.
    pub fn deactivate(&mut self) -> Result<(), SessionError> { self.shut_down("deactivated") }

    /// Forced deactivation, for when another tool takes over the map
    pub fn interrupt(&mut self) -> Result<(), SessionError> { self.shut_down("interrupted") }

    /// Host hook for map tool changes. A foreign tool interrupts this session.
    pub fn on_tool_changed(&mut self, tool: ToolId) -> Result<(), SessionError> {
        if tool == self.tool {
            Ok(())
        } else {
            self.interrupt()
        }
    }

    /// Empty the target layer's selection and filter and drop the match. Engaged drops to Armed.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.cancel_in_flight();
        let cleared = self.clear_layer();
        self.matches = None;
        if self.state == SessionState::Engaged {
            self.state = SessionState::Armed;
        }
        if let Err(e) = cleared {
            return Err(self.fail(SessionError::HostApply(e)));
        }
        action_info!(self, "cleared");
        if let Some(target) = &self.target {
            self.sink.notify(Notice::Cleared { layer: target.layer.clone() });
        }
        self.last_error = None;
        self.publish();
        Ok(())
    }

    /// Choose what to match on. Changing layer or field removes the current match and returns to Armed;
    /// changing only the operator behaves like [`set_operator`](Self::set_operator).
    pub fn set_target(&mut self, layer: impl Into<LayerId>, field: FieldRef, operator: Operator) -> Result<(), SessionError> {
        let target = match self.validate_target(layer.into(), field, operator) {
            Ok(target) => target,
            Err(e) => return Err(self.fail(e)),
        };
        let same_field = self.target.as_ref().map(|t| t.layer == target.layer && t.field == target.field);
        if same_field == Some(true) {
            return self.set_operator(target.operator);
        }

        self.cancel_in_flight();
        let unapplied = self.unapply();
        self.matches = None;
        if self.state == SessionState::Engaged {
            self.state = SessionState::Armed;
        }
        action_info!(self, "target set", "{} {} {}", target.layer, target.field, target.operator);
        self.target = Some(target);
        if let Err(e) = unapplied {
            return Err(self.fail(SessionError::HostApply(e)));
        }
        self.publish();
        Ok(())
    }

    /// Change the operator. While Engaged the layer is rescanned with the retained reference value.
    pub fn set_operator(&mut self, operator: Operator) -> Result<(), SessionError> {
        let Some(target) = self.target.as_ref() else {
            return Err(self.fail(SessionError::NoTarget));
        };
        if target.operator == operator {
            return Ok(());
        }
        if let Err(e) = operator.check(target.field.field_type) {
            return Err(self.fail(e.into()));
        }

        self.cancel_in_flight();
        if let Some(target) = self.target.as_mut() {
            target.operator = operator;
        }
        action_info!(self, "operator set", "{}", operator);
        let Some(reference) = self.reference().cloned() else {
            self.publish();
            return Ok(());
        };
        match self.rescan(&reference) {
            Ok(result) => self.engage(result),
            Err(e) => Err(self.revert(e)),
        }
    }

    /// Switch between selecting and filtering. An existing match is moved over without a rescan.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        if self.mode == mode {
            return Ok(());
        }
        self.mode = mode;
        action_info!(self, "mode set", "{:?}", mode);
        if self.state != SessionState::Engaged {
            self.publish();
            return Ok(());
        }
        if let Err(e) = self.unapply() {
            return Err(self.revert(SessionError::HostApply(e)));
        }
        self.apply_current()
    }

    /// Remove and re-install the current match under the current mode
    pub fn reapply(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Engaged {
            return Ok(());
        }
        if let Err(e) = self.unapply() {
            return Err(self.revert(SessionError::HostApply(e)));
        }
        self.apply_current()
    }

    /// Handle a map click. A click that hits no feature leaves the session as it was.
    pub fn click(&mut self, point: ScreenPoint) -> Result<(), SessionError> {
        if self.state == SessionState::Inactive {
            return Err(SessionError::Inactive);
        }
        let Some(layer) = self.target.as_ref().map(|t| t.layer.clone()) else {
            return Err(self.fail(SessionError::NoTarget));
        };
        match self.clicks.resolve(&layer, point) {
            Some(feature) => self.click_feature(&feature),
            None => {
                action_debug!(self, "click missed", "({}, {})", point.x, point.y);
                self.sink.notify(Notice::NoFeatureAtPoint { layer });
                Ok(())
            }
        }
    }

    /// Use `feature` as the reference and scan the target layer on the calling thread
    pub fn click_feature<F: Feature + ?Sized>(&mut self, feature: &F) -> Result<(), SessionError> {
        let job = self.begin_scan(feature)?;
        let result = match self.store.features(&job.layer) {
            Ok(features) => job.run(features).map_err(SessionError::from),
            Err(e) => Err(SessionError::from(e)),
        };
        self.complete_scan(job.ticket, result)
    }

    /// Extract the reference from `feature` and hand out a scan for the host to run, cancelling any scan
    /// still in flight. Extraction failures leave the session unchanged.
    pub fn begin_scan<F: Feature + ?Sized>(&mut self, feature: &F) -> Result<ScanJob, SessionError> {
        if self.state == SessionState::Inactive {
            return Err(SessionError::Inactive);
        }
        let Some(target) = self.target.clone() else {
            return Err(self.fail(SessionError::NoTarget));
        };
        let reference = match extract(feature, &target.field) {
            Ok(reference) => reference,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.cancel_in_flight();
        self.next_ticket += 1;
        let ticket = ScanTicket(self.next_ticket);
        let cancel = CancelFlag::new();
        self.in_flight = Some((ticket, cancel.clone()));
        action_debug!(self, "scan started", "{} with reference {} from {}", ticket, reference, reference.feature());
        Ok(ScanJob { ticket, layer: target.layer, field: target.field, operator: target.operator, reference, cancel })
    }

    /// Apply the outcome of a scan. Results of superseded scans are discarded with `Cancelled`.
    pub fn finish_scan(&mut self, ticket: ScanTicket, result: Result<MatchResult, BuildError>) -> Result<(), SessionError> {
        self.complete_scan(ticket, result.map_err(SessionError::from))
    }

    /// Replace the session configuration from stored settings
    pub fn apply_settings(&mut self, settings: &ToolSettings) -> Result<(), SessionError> {
        self.set_mode(settings.mode)?;
        match (&settings.layer, &settings.field) {
            (Some(layer), Some(field)) => {
                let field_type = match self.store.field_type(layer, field) {
                    Ok(Some(field_type)) => field_type,
                    Ok(None) => {
                        let err = ConfigurationError::UnknownField { layer: layer.clone(), field: field.clone() };
                        return Err(self.fail(err.into()));
                    }
                    Err(e) => return Err(self.fail(e.into())),
                };
                self.set_target(layer.clone(), FieldRef::new(field.clone(), field_type), settings.effective_operator())
            }
            _ if self.target.is_some() => self.set_operator(settings.effective_operator()),
            _ => Ok(()),
        }
    }

    /// Settings describing the current configuration
    pub fn current_settings(&self) -> ToolSettings {
        let operator = self.target.as_ref().map_or(Operator::Equal, |t| t.operator);
        ToolSettings {
            layer: self.target.as_ref().map(|t| t.layer.clone()),
            field: self.target.as_ref().map(|t| t.field.name.clone()),
            mode: self.mode,
            operator,
            advanced_collapsed: operator == Operator::Equal,
        }
    }

    fn validate_target(&self, layer: LayerId, field: FieldRef, operator: Operator) -> Result<Target, SessionError> {
        let target = Target::new(layer, field, operator)?;
        let actual = self
            .store
            .field_type(&target.layer, &target.field.name)?
            .ok_or_else(|| ConfigurationError::UnknownField { layer: target.layer.clone(), field: target.field.name.clone() })?;
        if actual != target.field.field_type {
            return Err(ConfigurationError::FieldTypeMismatch { field: target.field.name.clone(), declared: target.field.field_type, actual }.into());
        }
        Ok(target)
    }

    fn rescan(&self, reference: &ReferenceValue) -> Result<MatchResult, SessionError> {
        let target = self.target.as_ref().ok_or(SessionError::NoTarget)?;
        let features = self.store.features(&target.layer)?;
        Ok(MatchSetBuilder::new(&target.field, target.operator, reference).build(features)?)
    }

    fn complete_scan(&mut self, ticket: ScanTicket, result: Result<MatchResult, SessionError>) -> Result<(), SessionError> {
        if self.in_flight.as_ref().map(|(current, _)| *current) != Some(ticket) {
            action_debug!(self, "scan discarded", "{} was superseded", ticket);
            return Err(SessionError::Cancelled);
        }
        self.in_flight = None;
        match result {
            Ok(result) => self.engage(result),
            Err(SessionError::Cancelled) => Err(SessionError::Cancelled),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some((ticket, flag)) = self.in_flight.take() {
            action_debug!(self, "scan cancelled", "{}", ticket);
            flag.cancel();
        }
    }

    /// Replace the current match with `result` and apply it
    fn engage(&mut self, result: MatchResult) -> Result<(), SessionError> {
        if self.applied.is_some_and(|applied| applied != self.mode) {
            if let Err(e) = self.unapply() {
                return Err(self.revert(SessionError::HostApply(e)));
            }
        }
        self.matches = Some(result);
        self.state = SessionState::Engaged;
        self.apply_current()
    }

    /// Install the current match under the current mode. An open edit session keeps the match Engaged
    /// with nothing applied; any other host failure drops back to Armed.
    fn apply_current(&mut self) -> Result<(), SessionError> {
        match self.try_apply() {
            Ok(notice) => {
                action_info!(self, "engaged", "{}", notice);
                self.sink.notify(notice);
                self.last_error = None;
                self.publish();
                Ok(())
            }
            Err(e @ SessionError::EditSessionActive(_)) => {
                // an effect left over from the previous match no longer describes it
                if let Err(stale) = self.unapply() {
                    action_warn!(self, "stale effect not removed", "{}", stale);
                }
                Err(self.fail(e))
            }
            Err(e) => Err(self.revert(e)),
        }
    }

    fn try_apply(&mut self) -> Result<Notice, SessionError> {
        let (Some(target), Some(matches)) = (&self.target, &self.matches) else {
            return Err(SessionError::NoTarget);
        };
        match self.mode {
            Mode::Select => self.store.select(&target.layer, matches.identifiers()).map_err(apply_error)?,
            Mode::Filter => {
                if self.store.is_editing(&target.layer).map_err(apply_error)? {
                    return Err(SessionError::EditSessionActive(target.layer.clone()));
                }
                self.store.install_filter(&target.layer, matches.expression()).map_err(apply_error)?
            }
        }
        let notice = Notice::Matched {
            layer: target.layer.clone(),
            field: matches.field().name.clone(),
            operator: matches.operator(),
            reference: matches.reference().to_string(),
            count: matches.count(),
            skipped: matches.skipped(),
            mode: self.mode,
        };
        self.applied = Some(self.mode);
        Ok(notice)
    }

    /// Remove the effect this session installed, if any. The effect counts as removed even when the host fails.
    fn unapply(&mut self) -> Result<(), StoreError> {
        let applied = self.applied.take();
        let Some(target) = &self.target else { return Ok(()) };
        match applied {
            Some(Mode::Select) => self.store.clear_selection(&target.layer),
            Some(Mode::Filter) => self.store.clear_filter(&target.layer),
            None => Ok(()),
        }
    }

    /// Empty both the selection and the filter of the target layer
    fn clear_layer(&mut self) -> Result<(), StoreError> {
        self.applied = None;
        let Some(target) = &self.target else { return Ok(()) };
        let selection = self.store.clear_selection(&target.layer);
        let filter = self.store.clear_filter(&target.layer);
        selection.and(filter)
    }

    /// Give up on the current match after a failed apply: best-effort cleanup, then Armed
    fn revert(&mut self, err: SessionError) -> SessionError {
        if let Err(e) = self.clear_layer() {
            action_warn!(self, "rollback failed", "{}", e);
        }
        self.matches = None;
        if self.state == SessionState::Engaged {
            self.state = SessionState::Armed;
        }
        self.fail(err)
    }

    fn shut_down(&mut self, action: &str) -> Result<(), SessionError> {
        if self.state == SessionState::Inactive && self.applied.is_none() {
            return Ok(());
        }
        self.cancel_in_flight();
        let unapplied = self.unapply();
        self.matches = None;
        self.state = SessionState::Inactive;
        action_info!(self, action);
        if let Err(e) = unapplied {
            return Err(self.fail(SessionError::HostApply(e)));
        }
        self.sink.notify(Notice::Deactivated);
        self.publish();
        Ok(())
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        let kind = err.kind();
        action_warn!(self, "failed", "{}", err);
        self.last_error = Some(kind);
        self.sink.notify(Notice::Failed { kind, detail: err.to_string() });
        self.publish();
        err
    }

    fn publish(&self) {
        self.status.set(SessionStatus {
            state: self.state,
            mode: self.mode,
            match_count: self.matches.as_ref().map(MatchResult::count),
            skipped_count: self.matches.as_ref().map_or(0, MatchResult::skipped),
            last_error: self.last_error,
        });
    }
}

fn apply_error(err: StoreError) -> SessionError {
    match err {
        StoreError::EditSessionActive(layer) => SessionError::EditSessionActive(layer),
        other => SessionError::HostApply(other),
    }
}

impl<S: FeatureStore, C: MapClickSource, N: NotificationSink> Display for ToolSession<S, C, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "MatchTool({}, {:?})", self.tool, self.state) }
}
