//! Runtime choice between the two presentation strategies.

use crate::{
    carousel::CarouselDrawer,
    config::DrawConfig,
    error::Result,
    session::{DrawSession, Drawer, Step},
    slot::SlotDrawer,
    store::RecordStore,
    surface::Surface,
    Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which drawer presents the draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One label cycling through names
    #[default]
    Slot,
    /// Scrolling ring of names
    Carousel,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slot" | "text" => Ok(Strategy::Slot),
            "carousel" | "disk" => Ok(Strategy::Carousel),
            other => Err(Error::InvalidConfig(format!("unknown strategy: {other}"))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Slot => write!(f, "slot"),
            Strategy::Carousel => write!(f, "carousel"),
        }
    }
}

/// A drawer of either strategy behind one type, so hosts can pick at runtime
/// and still reach the carousel's pointer handling.
#[derive(Debug)]
pub enum AnyDrawer {
    Slot(SlotDrawer),
    Carousel(CarouselDrawer),
}

impl AnyDrawer {
    pub fn new(strategy: Strategy, config: DrawConfig) -> Result<Self> {
        Ok(match strategy {
            Strategy::Slot => AnyDrawer::Slot(SlotDrawer::new(config)?),
            Strategy::Carousel => AnyDrawer::Carousel(CarouselDrawer::new(config)?),
        })
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            AnyDrawer::Slot(_) => Strategy::Slot,
            AnyDrawer::Carousel(_) => Strategy::Carousel,
        }
    }

    pub fn press(&mut self, pointer_x: f64) {
        if let AnyDrawer::Carousel(drawer) = self {
            drawer.press(pointer_x);
        }
    }

    pub fn motion(&mut self, pointer_x: f64, surface: &mut dyn Surface) -> Result<usize> {
        match self {
            AnyDrawer::Carousel(drawer) => drawer.motion(pointer_x, surface),
            AnyDrawer::Slot(_) => Ok(0),
        }
    }

    pub fn release(&mut self) {
        if let AnyDrawer::Carousel(drawer) = self {
            drawer.release();
        }
    }

    pub fn resize(&mut self, surface: &mut dyn Surface) -> Result<usize> {
        match self {
            AnyDrawer::Carousel(drawer) => drawer.resize(surface),
            AnyDrawer::Slot(_) => Ok(0),
        }
    }

    /// Pick up pool changes made while a session is running: the slot drawer
    /// queues them for its next wrap, the carousel rebuilds its ring.
    pub fn refresh(&mut self, store: &dyn RecordStore, surface: &mut dyn Surface) -> Result<bool> {
        match self {
            AnyDrawer::Slot(drawer) => Ok(drawer.refresh_candidates(store).is_some()),
            AnyDrawer::Carousel(drawer) => drawer.rebuild(store, surface),
        }
    }
}

impl Drawer for AnyDrawer {
    fn session(&self) -> &DrawSession {
        match self {
            AnyDrawer::Slot(drawer) => drawer.session(),
            AnyDrawer::Carousel(drawer) => drawer.session(),
        }
    }

    fn session_mut(&mut self) -> &mut DrawSession {
        match self {
            AnyDrawer::Slot(drawer) => drawer.session_mut(),
            AnyDrawer::Carousel(drawer) => drawer.session_mut(),
        }
    }

    fn start(&mut self, store: &dyn RecordStore, surface: &mut dyn Surface) -> Result<bool> {
        match self {
            AnyDrawer::Slot(drawer) => drawer.start(store, surface),
            AnyDrawer::Carousel(drawer) => drawer.start(store, surface),
        }
    }

    fn step(&mut self, store: &mut dyn RecordStore, surface: &mut dyn Surface) -> Result<Step> {
        match self {
            AnyDrawer::Slot(drawer) => drawer.step(store, surface),
            AnyDrawer::Carousel(drawer) => drawer.step(store, surface),
        }
    }
}
