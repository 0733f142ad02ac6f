//! # Namedraw Engine
//!
//! A deterministic name-drawing engine: pick one not-yet-drawn person from a
//! pool, with a slot-machine style animation, and mark them drawn.
//!
//! This crate holds the draw logic only. It knows nothing about windows,
//! fonts or timers; animation is driven by the host calling
//! [`Drawer::step`] and sleeping for the returned delay, and everything
//! visual goes through the [`Surface`] trait.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never touches files, clocks or the network
//! - **Deterministic**: with a fixed `seed` the same pool draws the same way
//! - **Cooperative**: no threads or timers, the host owns the schedule
//!
//! ## Core Concepts
//!
//! ### Records and the pool
//!
//! A [`NameRecord`] carries a name, [`Sex`], [`Remark`] and [`Status`]. The
//! [`NameStore`] owns the pool; drawers see it through [`RecordStore`] and only
//! ever flip one record from `not_drawn` to `drawn` per session.
//!
//! ### Strategies
//!
//! - [`SlotDrawer`] cycles a single label through a reshuffling
//!   [`SelectionSequencer`], slowing down under a [`Pacer`]
//! - [`CarouselDrawer`] scrolls a virtualized [`CarouselWindow`] and settles on
//!   the item nearest the center
//!
//! Both share the [`DrawSession`] state machine and report through
//! [`DrawEvent`] listeners.
//!
//! ## Quick Start
//!
//! ```rust
//! use namedraw_engine::{
//!     CommandBuffer, DrawConfig, Drawer, Geometry, NameRecord, NameStore, Remark,
//!     Sex, SlotDrawer, Status, Step,
//! };
//!
//! let mut store = NameStore::from_records(vec![
//!     NameRecord::new("Alice", Sex::Female, Remark::English),
//!     NameRecord::new("Kenji", Sex::Male, Remark::Japanese),
//! ])
//! .unwrap();
//! let mut surface = CommandBuffer::new(Geometry::new(800.0, 200.0));
//! let config = DrawConfig { seed: Some(1), ..DrawConfig::default() };
//! let mut drawer = SlotDrawer::new(config).unwrap();
//!
//! assert!(drawer.start(&store, &mut surface).unwrap());
//! drawer.stop();
//! let winner = loop {
//!     match drawer.step(&mut store, &mut surface).unwrap() {
//!         Step::Settled { record } => break record,
//!         Step::Continue { .. } => continue,
//!         Step::Idle => unreachable!(),
//!     }
//! };
//! assert_eq!(store.get(&winner.name).unwrap().status, Status::Drawn);
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module exposes a session handle to C callers. Records, config,
//! steps and surface commands cross the boundary as JSON strings.

pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod ffi;
pub mod filter;
pub mod record;
pub mod sequencer;
pub mod session;
pub mod slot;
pub mod store;
pub mod strategy;
pub mod surface;
pub mod window;

// Re-export main types at crate root
pub use carousel::CarouselDrawer;
pub use config::DrawConfig;
pub use error::Error;
pub use events::Dispatcher;
pub use filter::DrawFilter;
pub use record::{NameRecord, Remark, Sex, Status};
pub use sequencer::{Pace, Pacer, SelectionSequencer};
pub use session::{
    eligible_candidates, DrawEvent, DrawEventKind, DrawSession, Drawer, Rejection, SessionState,
    Step,
};
pub use slot::SlotDrawer;
pub use store::{NameStore, QueryBuilder, RecordStore, StatusCounts, StoreEvent};
pub use strategy::{AnyDrawer, Strategy};
pub use surface::{CommandBuffer, DrawCommand, Geometry, ItemState, Surface};
pub use window::{font_scale, CarouselWindow, Recycle, RenderableItem};

/// Surface item identifier
pub type ItemHandle = u64;
/// Durations in milliseconds
pub type Millis = u64;
