//! Carousel drawer: the eligible set scrolls past as a ring of names, scaled
//! by distance from the center, and the draw lands on the item nearest the
//! center when it settles.

use crate::{
    config::DrawConfig,
    error::Result,
    record::{NameRecord, Status},
    session::{eligible_candidates, DrawSession, Drawer, SessionState, Step},
    store::RecordStore,
    surface::Surface,
    window::CarouselWindow,
    Error,
};
use rand::{rngs::StdRng, seq::SliceRandom};

/// Drawer backed by a virtualized [`CarouselWindow`].
#[derive(Debug)]
pub struct CarouselDrawer {
    config: DrawConfig,
    session: DrawSession,
    rng: StdRng,
    window: CarouselWindow,
}

impl CarouselDrawer {
    /// Create a drawer. Fails when the config does not validate.
    pub fn new(config: DrawConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.rng();
        let window = CarouselWindow::new(config.relative_interval, config.max_font_size);
        Ok(Self {
            config,
            session: DrawSession::new(),
            rng,
            window,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn window(&self) -> &CarouselWindow {
        &self.window
    }

    /// Pointer pressed. Ignored unless touch input is enabled.
    pub fn press(&mut self, pointer_x: f64) {
        if self.config.adapt_touch && !self.window.is_empty() {
            self.window.press(pointer_x);
        }
    }

    /// Pointer moved. Returns the number of recycles performed.
    pub fn motion(&mut self, pointer_x: f64, surface: &mut dyn Surface) -> Result<usize> {
        if !self.config.adapt_touch {
            return Ok(0);
        }
        self.window.motion(pointer_x, surface)
    }

    pub fn release(&mut self) {
        self.window.release();
    }

    /// Viewport changed size. Returns the number of recycles performed.
    pub fn resize(&mut self, surface: &mut dyn Surface) -> Result<usize> {
        match self.window.resize(surface) {
            Ok(recycled) => Ok(recycled),
            Err(err) => {
                self.window.clear(surface);
                self.session.abort();
                Err(err)
            }
        }
    }

    /// Rebuild the working set from the store while a session is running.
    ///
    /// Returns false when nothing is running. When nobody is eligible any more
    /// the session is aborted and the window cleared.
    pub fn rebuild(&mut self, store: &dyn RecordStore, surface: &mut dyn Surface) -> Result<bool> {
        if !self.session.is_drawing() {
            return Ok(false);
        }
        match eligible_candidates(store.records(), &self.config.filter) {
            Ok(candidates) => {
                tracing::debug!(count = candidates.len(), "carousel rebuilt");
                self.populate(candidates, surface)?;
                Ok(true)
            }
            Err(reason) => {
                tracing::warn!(%reason, "carousel rebuild left no candidates");
                self.window.clear(surface);
                self.session.abort();
                Ok(false)
            }
        }
    }

    fn populate(
        &mut self,
        mut candidates: Vec<NameRecord>,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        candidates.shuffle(&mut self.rng);
        if let Err(err) = self.window.populate(candidates, surface) {
            self.window.clear(surface);
            self.session.abort();
            return Err(err);
        }
        Ok(())
    }

    fn commit(&mut self, store: &mut dyn RecordStore, surface: &mut dyn Surface) -> Result<Step> {
        let selected = match self.window.nearest_center() {
            Some(item) => item.record.clone(),
            None => {
                self.session.abort();
                return Err(Error::WindowInvariant(
                    "settled with nothing on screen".into(),
                ));
            }
        };
        let committed = self.session.finish(store, &selected);
        self.window.clear(surface);
        committed?;

        let mut record = selected;
        record.status = Status::Drawn;
        Ok(Step::Settled { record })
    }
}

impl Drawer for CarouselDrawer {
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
        self.populate(candidates, surface)?;
        Ok(true)
    }

    fn step(&mut self, store: &mut dyn RecordStore, surface: &mut dyn Surface) -> Result<Step> {
        match self.session.state() {
            SessionState::Idle | SessionState::Done => Ok(Step::Idle),
            SessionState::Animating if self.session.stop_requested() => {
                self.session.settle()?;
                self.commit(store, surface)
            }
            SessionState::Animating => {
                if self.config.spin_speed != 0.0 && !self.window.is_dragging() {
                    if let Err(err) = self.window.scroll_by(-self.config.spin_speed, surface) {
                        self.window.clear(surface);
                        self.session.abort();
                        return Err(err);
                    }
                }
                Ok(Step::after(self.config.base_interval_ms))
            }
            SessionState::Settling => self.commit(store, surface),
        }
    }
}
