//! Single-slot drawer: one label cycling through shuffled names.

use crate::{
    config::DrawConfig,
    error::Result,
    record::NameRecord,
    sequencer::{Pace, Pacer, SelectionSequencer},
    session::{eligible_candidates, DrawSession, Drawer, Rejection, SessionState, Step},
    store::RecordStore,
    surface::Surface,
    Error, ItemHandle, Millis,
};
use rand::rngs::StdRng;

/// Per-session animation state.
#[derive(Debug)]
struct Run {
    sequencer: SelectionSequencer,
    pacer: Pacer,
}

/// Drawer that redisplays one candidate per tick in a single label, slowing
/// down until it settles on the last name shown.
#[derive(Debug)]
pub struct SlotDrawer {
    config: DrawConfig,
    session: DrawSession,
    rng: StdRng,
    run: Option<Run>,
    label: Option<ItemHandle>,
}

impl SlotDrawer {
    /// Create a drawer. Fails when the config does not validate.
    pub fn new(config: DrawConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.rng();
        Ok(Self {
            config,
            session: DrawSession::new(),
            rng,
            run: None,
            label: None,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Handle of the label item while a session owns one.
    pub fn label(&self) -> Option<ItemHandle> {
        self.label
    }

    /// Candidate currently shown by the running session.
    pub fn current(&self) -> Option<&NameRecord> {
        self.run.as_ref().and_then(|run| run.sequencer.current())
    }

    /// Tick interval of the running session.
    pub fn interval(&self) -> Option<Millis> {
        self.run.as_ref().map(|run| run.pacer.interval())
    }

    /// Recompute the eligible set from the store and queue it for the next
    /// wrap of the running cycle.
    ///
    /// Returns the size of the queued set, or `None` when nothing is running
    /// or nobody is eligible any more (the current set is then kept).
    pub fn refresh_candidates(&mut self, store: &dyn RecordStore) -> Option<usize> {
        let run = self.run.as_mut()?;
        match eligible_candidates(store.records(), &self.config.filter) {
            Ok(candidates) => {
                let count = candidates.len();
                run.sequencer.replace(candidates);
                tracing::debug!(count, "candidate set queued for next wrap");
                Some(count)
            }
            Err(reason) => {
                tracing::warn!(
                    %reason,
                    "refresh found no eligible candidates, keeping current set"
                );
                None
            }
        }
    }

    fn ensure_label(&mut self, surface: &mut dyn Surface) -> ItemHandle {
        if let Some(label) = self.label {
            return label;
        }
        let geometry = surface.geometry();
        let label = surface.create_item("");
        surface.move_to(label, geometry.center_x(), Some(geometry.middle_y()));
        surface.set_font_size(label, self.config.max_font_size);
        self.label = Some(label);
        label
    }

    /// Advance the cycle and show the new candidate.
    fn redisplay(&mut self, surface: &mut dyn Surface) -> Result<NameRecord> {
        let label = self.ensure_label(surface);
        let record = self
            .run
            .as_mut()
            .and_then(|run| run.sequencer.advance(&mut self.rng).cloned())
            .ok_or(Error::Rejected(Rejection::NoMatch))?;
        surface.set_text(label, &record.name);
        Ok(record)
    }

    fn release_label(&mut self, surface: &mut dyn Surface) {
        if let Some(label) = self.label.take() {
            surface.destroy_item(label);
        }
    }

    fn end_run(&mut self, surface: &mut dyn Surface) {
        self.run = None;
        self.release_label(surface);
        self.session.abort();
    }
}

impl Drawer for SlotDrawer {
    fn session(&self) -> &DrawSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    fn start(&mut self, store: &dyn RecordStore, surface: &mut dyn Surface) -> Result<bool> {
        let Some(candidates) = self.session.begin(store, &self.config.filter) else {
            return Ok(false);
        };
        let sequencer = SelectionSequencer::new(candidates, &mut self.rng);
        let pacer = Pacer::new(
            self.config.base_interval_ms,
            self.config.max_interval_ms,
            &mut self.rng,
        );
        tracing::debug!(
            interval = pacer.interval(),
            ceiling = pacer.ceiling(),
            "slot pacing initialized"
        );
        self.run = Some(Run { sequencer, pacer });
        self.ensure_label(surface);
        Ok(true)
    }

    fn step(&mut self, store: &mut dyn RecordStore, surface: &mut dyn Surface) -> Result<Step> {
        if self.run.is_none() {
            return Ok(Step::Idle);
        }
        match self.session.state() {
            SessionState::Idle | SessionState::Done => Ok(Step::Idle),
            SessionState::Animating => {
                let stopping = self.session.stop_requested();
                let pace = match self.run.as_mut() {
                    Some(run) => run.pacer.next(stopping, &mut self.rng),
                    None => return Ok(Step::Idle),
                };
                match pace {
                    Pace::Tick(delay) => {
                        if let Err(err) = self.redisplay(surface) {
                            self.end_run(surface);
                            return Err(err);
                        }
                        tracing::trace!(delay, stopping, "slot tick");
                        Ok(Step::after(delay))
                    }
                    Pace::Final(wait) => {
                        self.session.settle()?;
                        tracing::debug!(wait, "slot settling");
                        Ok(Step::after(wait))
                    }
                }
            }
            SessionState::Settling => {
                if let Some(run) = self.run.as_mut() {
                    run.sequencer.wrap_now(&mut self.rng);
                }
                let selected = match self.redisplay(surface) {
                    Ok(record) => record,
                    Err(err) => {
                        self.end_run(surface);
                        return Err(err);
                    }
                };
                self.run = None;
                let committed = self.session.finish(store, &selected);
                self.release_label(surface);
                committed?;
                let mut record = selected;
                record.status = crate::record::Status::Drawn;
                Ok(Step::Settled { record })
            }
        }
    }
}
