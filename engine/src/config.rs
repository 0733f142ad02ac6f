//! Drawer configuration.
//!
//! Everything a drawer reads at session start is passed in here; drawers
//! never consult process-wide state.

use crate::{error::Result, filter::DrawFilter, Error, Millis};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration shared by both drawer strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawConfig {
    /// Fastest tick interval; the slot drawer starts at ten times this
    pub base_interval_ms: Millis,
    /// Slowest tick interval and the wait before the settle tick
    pub max_interval_ms: Millis,
    /// Font size at the center of the carousel (and of the slot label)
    pub max_font_size: u32,
    /// Carousel slot spacing as a fraction of viewport width
    pub relative_interval: f64,
    /// Carousel auto-scroll in pixels per frame; 0 leaves it drag-only
    pub spin_speed: f64,
    /// Candidate selectors
    pub filter: DrawFilter,
    /// Accept press / motion / release events on the carousel
    pub adapt_touch: bool,
    /// Fixed RNG seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 20,
            max_interval_ms: 1000,
            max_font_size: 80,
            relative_interval: 0.25,
            spin_speed: 0.0,
            filter: DrawFilter::default(),
            adapt_touch: false,
            seed: None,
        }
    }
}

impl DrawConfig {
    /// Check the timing and layout parameters.
    ///
    /// The ceiling of the slow-down is drawn from `[20 × base, max]`, so
    /// `max_interval_ms` must be at least twenty base intervals; the stop
    /// decrement is drawn from `[2, base]`, so `base_interval_ms` must be at
    /// least 2.
    pub fn validate(&self) -> Result<()> {
        if self.base_interval_ms < 2 {
            return Err(Error::InvalidConfig(format!(
                "baseIntervalMs must be at least 2, got {}",
                self.base_interval_ms
            )));
        }
        if self.max_interval_ms < self.base_interval_ms * 20 {
            return Err(Error::InvalidConfig(format!(
                "maxIntervalMs must be at least 20 x baseIntervalMs ({}), got {}",
                self.base_interval_ms * 20,
                self.max_interval_ms
            )));
        }
        if !(self.relative_interval > 0.0 && self.relative_interval <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "relativeInterval must be in (0, 1], got {}",
                self.relative_interval
            )));
        }
        if self.max_font_size == 0 {
            return Err(Error::InvalidConfig("maxFontSize must be positive".into()));
        }
        if !self.spin_speed.is_finite() {
            return Err(Error::InvalidConfig("spinSpeed must be finite".into()));
        }
        Ok(())
    }

    /// Build the RNG for a drawer, seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
