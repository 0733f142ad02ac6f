//! The draw session contract shared by every drawer strategy.
//!
//! A session moves `Idle → Animating → Settling → Done → Idle`. The
//! [`DrawSession`] value owns that state, the stop flag and the listener
//! table; strategies ([`crate::SlotDrawer`], [`crate::CarouselDrawer`]) own the
//! animation and call into the session to begin, settle and commit.

use crate::{
    error::Result,
    events::Dispatcher,
    filter::DrawFilter,
    record::NameRecord,
    store::RecordStore,
    surface::Surface,
    Error, Millis,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why a draw cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// The pool is empty
    NoItems,
    /// The pool has records but none is still not drawn
    AllDrawn,
    /// Undrawn records exist but none passes the filter
    NoMatch,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoItems => write!(f, "no items to draw"),
            Rejection::AllDrawn => write!(f, "all items have been drawn"),
            Rejection::NoMatch => write!(f, "no undrawn item matches the filter"),
        }
    }
}

/// Lifecycle state of a draw session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Animating,
    Settling,
    Done,
}

/// Event kinds listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawEventKind {
    Done,
    Rejected,
}

/// Payload delivered to session listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DrawEvent {
    Done { record: NameRecord },
    Rejected { reason: Rejection },
}

impl DrawEvent {
    pub fn kind(&self) -> DrawEventKind {
        match self {
            DrawEvent::Done { .. } => DrawEventKind::Done,
            DrawEvent::Rejected { .. } => DrawEventKind::Rejected,
        }
    }
}

/// What the host should do after a [`Drawer::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Step {
    /// Call `step` again after the delay
    #[serde(rename_all = "camelCase")]
    Continue { delay_ms: Millis },
    /// The session committed this record and is idle again
    Settled { record: NameRecord },
    /// No session is running
    Idle,
}

impl Step {
    pub(crate) fn after(delay_ms: Millis) -> Self {
        Step::Continue { delay_ms }
    }

    /// Delay before the next step, if the session is still running.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Step::Continue { delay_ms } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }
}

/// Eligibility check shared by `can_draw` and `begin`.
///
/// `NoItems` and `AllDrawn` look at the whole pool and are checked before the
/// filter runs.
pub fn eligible_candidates(
    records: &[NameRecord],
    filter: &DrawFilter,
) -> std::result::Result<Vec<NameRecord>, Rejection> {
    precheck(records)?;
    let candidates = filter.apply(records);
    if candidates.is_empty() {
        return Err(Rejection::NoMatch);
    }
    Ok(candidates)
}

fn precheck(records: &[NameRecord]) -> std::result::Result<(), Rejection> {
    if records.is_empty() {
        Err(Rejection::NoItems)
    } else if !records.iter().any(NameRecord::is_not_drawn) {
        Err(Rejection::AllDrawn)
    } else {
        Ok(())
    }
}

/// Session state, stop flag and listeners for one drawer.
#[derive(Default)]
pub struct DrawSession {
    state: SessionState,
    stop_requested: bool,
    reason: Option<Rejection>,
    events: Dispatcher<DrawEventKind, DrawEvent>,
    done_callback: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for DrawSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawSession")
            .field("state", &self.state)
            .field("stop_requested", &self.stop_requested)
            .field("reason", &self.reason)
            .field("events", &self.events)
            .field("done_callback", &self.done_callback.is_some())
            .finish()
    }
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while animating or settling.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Animating | SessionState::Settling)
    }

    /// Whether `stop` has been requested for the running session.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// The most recent rejection reason.
    pub fn reason(&self) -> Option<Rejection> {
        self.reason
    }

    /// Register a listener.
    pub fn subscribe(&mut self, kind: DrawEventKind, listener: impl FnMut(&DrawEvent) + 'static) {
        self.events.subscribe(kind, listener);
    }

    /// Set the no-argument callback invoked after every committed draw.
    pub fn set_done_callback(&mut self, callback: impl FnMut() + 'static) {
        self.done_callback = Some(Box::new(callback));
    }

    fn reject(&mut self, reason: Rejection) {
        tracing::warn!(%reason, "draw rejected");
        self.reason = Some(reason);
        self.events
            .emit(DrawEventKind::Rejected, &DrawEvent::Rejected { reason });
    }

    /// Check whether the pool allows a draw, notifying `Rejected` listeners
    /// when it does not. Never changes the session state.
    pub fn can_draw(&mut self, store: &dyn RecordStore) -> bool {
        match precheck(store.records()) {
            Ok(()) => true,
            Err(reason) => {
                self.reject(reason);
                false
            }
        }
    }

    /// Start a session: compute the eligible set and move to `Animating`.
    ///
    /// Returns `None` without any state change when a session is already
    /// running or the draw is rejected.
    pub fn begin(
        &mut self,
        store: &dyn RecordStore,
        filter: &DrawFilter,
    ) -> Option<Vec<NameRecord>> {
        if self.is_drawing() {
            tracing::debug!(state = ?self.state, "start ignored, session already running");
            return None;
        }
        match eligible_candidates(store.records(), filter) {
            Ok(candidates) => {
                tracing::info!(candidates = candidates.len(), "draw session started");
                self.state = SessionState::Animating;
                self.stop_requested = false;
                self.reason = None;
                Some(candidates)
            }
            Err(reason) => {
                self.reject(reason);
                None
            }
        }
    }

    /// Ask the running session to wind down. Returns false when nothing is
    /// animating.
    pub fn request_stop(&mut self) -> bool {
        if self.state == SessionState::Animating {
            self.stop_requested = true;
            true
        } else {
            false
        }
    }

    /// Enter `Settling`: the next commit ends the session.
    pub fn settle(&mut self) -> Result<()> {
        if self.state != SessionState::Animating {
            return Err(Error::InvalidTransition {
                from: self.state,
                to: SessionState::Settling,
            });
        }
        self.state = SessionState::Settling;
        Ok(())
    }

    /// Commit `selected` as drawn, then notify `Done` listeners and the done
    /// callback. Runs exactly once per session.
    ///
    /// A failed commit ends the session without notifying anyone.
    pub fn finish(&mut self, store: &mut dyn RecordStore, selected: &NameRecord) -> Result<()> {
        if !self.is_drawing() {
            return Err(Error::InvalidTransition {
                from: self.state,
                to: SessionState::Done,
            });
        }
        if let Err(err) = store.mark_drawn(&selected.name) {
            tracing::error!(name = %selected.name, error = %err, "commit failed");
            self.abort();
            return Err(err);
        }

        self.state = SessionState::Done;
        tracing::info!(name = %selected.name, "draw settled");
        let mut record = selected.clone();
        record.status = crate::record::Status::Drawn;
        self.events
            .emit(DrawEventKind::Done, &DrawEvent::Done { record });

        self.state = SessionState::Idle;
        self.stop_requested = false;
        if let Some(callback) = self.done_callback.as_mut() {
            callback();
        }
        Ok(())
    }

    /// Drop the running session without committing anything.
    pub fn abort(&mut self) {
        if self.state != SessionState::Idle {
            tracing::warn!(state = ?self.state, "draw session aborted");
        }
        self.state = SessionState::Idle;
        self.stop_requested = false;
    }
}

/// The contract every presentation strategy implements.
///
/// Drawers are driven cooperatively: the host calls [`Drawer::start`], then
/// keeps calling [`Drawer::step`] after each returned delay until it gets
/// [`Step::Settled`].
pub trait Drawer {
    fn session(&self) -> &DrawSession;

    fn session_mut(&mut self) -> &mut DrawSession;

    /// Begin a session. Returns `Ok(false)` when rejected or already running.
    fn start(&mut self, store: &dyn RecordStore, surface: &mut dyn Surface) -> Result<bool>;

    /// Advance the animation by one tick.
    fn step(&mut self, store: &mut dyn RecordStore, surface: &mut dyn Surface) -> Result<Step>;

    /// Request a stop at the next settle point.
    fn stop(&mut self) -> bool {
        self.session_mut().request_stop()
    }

    fn is_drawing(&self) -> bool {
        self.session().is_drawing()
    }

    fn can_draw(&mut self, store: &dyn RecordStore) -> bool {
        self.session_mut().can_draw(store)
    }

    fn reason(&self) -> Option<Rejection> {
        self.session().reason()
    }

    fn set_done_callback(&mut self, callback: Box<dyn FnMut()>) {
        self.session_mut().set_done_callback(callback);
    }

    fn subscribe(&mut self, kind: DrawEventKind, listener: Box<dyn FnMut(&DrawEvent)>) {
        self.session_mut().subscribe(kind, listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Remark, Sex, Status};
    use crate::store::NameStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store(records: Vec<NameRecord>) -> NameStore {
        NameStore::from_records(records).unwrap()
    }

    fn alice() -> NameRecord {
        NameRecord::new("Alice", Sex::Female, Remark::None)
    }

    fn bob() -> NameRecord {
        NameRecord::new("Bob", Sex::Male, Remark::None)
    }

    #[test]
    fn can_draw_reasons() {
        let mut session = DrawSession::new();

        assert!(!session.can_draw(&store(vec![])));
        assert_eq!(session.reason(), Some(Rejection::NoItems));

        let all_drawn = store(vec![
            alice().with_status(Status::Drawn),
            bob().with_status(Status::Drawn),
        ]);
        assert!(!session.can_draw(&all_drawn));
        assert_eq!(session.reason(), Some(Rejection::AllDrawn));

        let deleted_only = store(vec![alice().with_status(Status::Deleted)]);
        assert!(!session.can_draw(&deleted_only));
        assert_eq!(session.reason(), Some(Rejection::AllDrawn));

        assert!(session.can_draw(&store(vec![alice()])));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn rejection_notifies_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = DrawSession::new();
        let sink = Rc::clone(&seen);
        session.subscribe(DrawEventKind::Rejected, move |e| sink.borrow_mut().push(e.clone()));

        assert!(session.begin(&store(vec![]), &DrawFilter::any()).is_none());
        assert_eq!(
            *seen.borrow(),
            vec![DrawEvent::Rejected {
                reason: Rejection::NoItems
            }]
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn no_match_is_reported_after_pool_checks() {
        let mut session = DrawSession::new();
        let pool = store(vec![alice()]);
        let filter = DrawFilter::any().with_sex(Sex::Male);
        assert!(session.begin(&pool, &filter).is_none());
        assert_eq!(session.reason(), Some(Rejection::NoMatch));
    }

    #[test]
    fn begin_twice_is_a_noop() {
        let mut session = DrawSession::new();
        let pool = store(vec![alice(), bob()]);
        assert!(session.begin(&pool, &DrawFilter::any()).is_some());
        assert!(session.begin(&pool, &DrawFilter::any()).is_none());
        assert_eq!(session.state(), SessionState::Animating);
        assert_eq!(session.reason(), None);
    }

    #[test]
    fn lifecycle_commits_and_notifies() {
        let done = Rc::new(RefCell::new(Vec::new()));
        let callbacks = Rc::new(RefCell::new(0));

        let mut session = DrawSession::new();
        let sink = Rc::clone(&done);
        session.subscribe(DrawEventKind::Done, move |e| sink.borrow_mut().push(e.clone()));
        let counter = Rc::clone(&callbacks);
        session.set_done_callback(move || *counter.borrow_mut() += 1);

        let mut pool = store(vec![alice(), bob().with_status(Status::Drawn)]);
        let candidates = session.begin(&pool, &DrawFilter::any()).unwrap();
        assert_eq!(candidates, vec![alice()]);

        assert!(session.request_stop());
        assert!(session.stop_requested());
        session.settle().unwrap();
        assert!(!session.request_stop());
        session.finish(&mut pool, &candidates[0]).unwrap();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.stop_requested());
        assert_eq!(pool.get("Alice").unwrap().status, Status::Drawn);
        assert_eq!(*callbacks.borrow(), 1);
        assert_eq!(done.borrow().len(), 1);
        assert_eq!(done.borrow()[0].kind(), DrawEventKind::Done);
    }

    #[test]
    fn finish_requires_running_session() {
        let mut session = DrawSession::new();
        let mut pool = store(vec![alice()]);
        let err = session.finish(&mut pool, &alice()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert!(session.settle().is_err());
    }

    #[test]
    fn failed_commit_aborts_silently() {
        let callbacks = Rc::new(RefCell::new(0));
        let mut session = DrawSession::new();
        let counter = Rc::clone(&callbacks);
        session.set_done_callback(move || *counter.borrow_mut() += 1);

        let mut pool = store(vec![alice()]);
        session.begin(&pool, &DrawFilter::any()).unwrap();
        let err = session.finish(&mut pool, &bob()).unwrap_err();
        assert_eq!(err, Error::RecordNotFound("Bob".into()));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(*callbacks.borrow(), 0);
    }

    #[test]
    fn step_serialization_format() {
        let step = Step::after(120);
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            serde_json::json!({"kind": "continue", "delayMs": 120})
        );
        assert_eq!(step.delay(), Some(Duration::from_millis(120)));
        assert_eq!(Step::Idle.delay(), None);
    }
}
