//! Virtualized carousel window.
//!
//! The carousel treats its working set as a ring. Only the items in
//! `showing` are visible on the surface; the rest wait in `hidden`, in ring
//! order. When the strip is shifted far enough that the leftmost item leaves
//! the viewport, that item is parked at the tail of `hidden` and the head of
//! `hidden` is shown at the right end (rotate-left); the mirror image happens
//! on the right edge. Every item keeps its surface handle for the whole
//! session, so recycling is only visibility and position updates.

use crate::{
    error::Result,
    record::NameRecord,
    surface::{Geometry, Surface},
    Error, ItemHandle,
};
use std::collections::{HashSet, VecDeque};

const PLACEMENT_EPSILON: f64 = 1e-9;

/// Triangular depth scale: 1.0 at `center`, falling linearly to 0.0 at
/// `0` and at `2 × center`. Clamped to `[0, 1]` for items outside the
/// viewport.
pub fn font_scale(x: f64, center: f64) -> f64 {
    if center <= 0.0 {
        return 0.0;
    }
    let scale = if x < center {
        x / center
    } else {
        1.0 - (x - center) / center
    };
    scale.clamp(0.0, 1.0)
}

/// A record materialized on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableItem {
    pub handle: ItemHandle,
    pub record: NameRecord,
    /// Horizontal center in surface units
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    press_x: f64,
    origin: f64,
}

/// Which way a recycle rotated the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recycle {
    Left,
    Right,
}

/// Bounded visible window over a ring of renderable items.
#[derive(Debug, Clone)]
pub struct CarouselWindow {
    showing: VecDeque<RenderableItem>,
    hidden: VecDeque<RenderableItem>,
    working_len: usize,
    geometry: Geometry,
    spacing: f64,
    max_font_size: u32,
    offset: f64,
    drag: Option<DragAnchor>,
    recycled: Vec<Recycle>,
}

impl CarouselWindow {
    /// Create an empty window. `spacing` is the slot width as a fraction of
    /// the viewport width.
    pub fn new(spacing: f64, max_font_size: u32) -> Self {
        Self {
            showing: VecDeque::new(),
            hidden: VecDeque::new(),
            working_len: 0,
            geometry: Geometry::default(),
            spacing,
            max_font_size,
            offset: 0.0,
            drag: None,
            recycled: Vec::new(),
        }
    }

    /// Materialize `candidates` (in ring order) and lay out the initial
    /// visible slots at fractions `0, spacing, 2 × spacing, …` of the width,
    /// while the fraction stays within `1.0`.
    pub fn populate(
        &mut self,
        candidates: Vec<NameRecord>,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        self.clear(surface);
        self.geometry = surface.geometry();
        if self.geometry.width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "carousel needs a viewport width, got {}",
                self.geometry.width
            )));
        }
        let y = self.geometry.middle_y();

        for record in candidates {
            let handle = surface.create_item(&record.name);
            surface.set_visible(handle, false);
            surface.move_to(handle, 0.0, Some(y));
            self.hidden.push_back(RenderableItem {
                handle,
                record,
                x: 0.0,
            });
        }
        self.working_len = self.hidden.len();

        let mut slot = 0usize;
        loop {
            let fraction = slot as f64 * self.spacing;
            if fraction > 1.0 + PLACEMENT_EPSILON {
                break;
            }
            let Some(mut item) = self.hidden.pop_front() else {
                break;
            };
            item.x = self.geometry.width * fraction;
            surface.set_visible(item.handle, true);
            surface.move_to(item.handle, item.x, None);
            self.showing.push_back(item);
            slot += 1;
        }

        tracing::debug!(
            showing = self.showing.len(),
            hidden = self.hidden.len(),
            width = self.geometry.width,
            "carousel populated"
        );
        self.rescale(surface);
        self.check_invariants()
    }

    /// Destroy every item and forget the working set.
    pub fn clear(&mut self, surface: &mut dyn Surface) {
        for item in self.showing.drain(..).chain(self.hidden.drain(..)) {
            surface.destroy_item(item.handle);
        }
        self.working_len = 0;
        self.offset = 0.0;
        self.drag = None;
        self.recycled.clear();
    }

    /// Slot width in surface units.
    pub fn slot_width(&self) -> f64 {
        self.spacing * self.geometry.width
    }

    /// Uniform item half-width used by the recycle thresholds.
    pub fn half_width(&self) -> f64 {
        self.slot_width() / 2.0
    }

    /// Upper bound on `showing`: the slots that tile the viewport plus one
    /// buffer item on each side.
    pub fn max_showing(&self) -> usize {
        ((1.0 + PLACEMENT_EPSILON) / self.spacing).floor() as usize + 1 + 2
    }

    /// Font size for an item centered at `x`.
    pub fn font_size_at(&self, x: f64) -> u32 {
        (f64::from(self.max_font_size) * font_scale(x, self.geometry.center_x())) as u32
    }

    /// Re-apply the depth scale to every visible item, reading positions back
    /// from the surface.
    pub fn rescale(&self, surface: &mut dyn Surface) {
        for item in &self.showing {
            let x = surface.item_position(item.handle).unwrap_or(item.x);
            surface.set_font_size(item.handle, self.font_size_at(x));
        }
    }

    /// Adopt the new viewport geometry.
    ///
    /// The visible strip is laid out again at the new slot width, starting
    /// from the leftmost item scaled into the new width, then recycled and
    /// rescaled. The cumulative offset is left alone. Returns how many
    /// recycles happened.
    pub fn resize(&mut self, surface: &mut dyn Surface) -> Result<usize> {
        let previous = self.geometry;
        let geometry = surface.geometry();
        if geometry.width <= 0.0 {
            tracing::debug!(width = geometry.width, "ignoring collapsed viewport");
            return Ok(0);
        }
        self.geometry = geometry;
        if self.working_len == 0 {
            return Ok(0);
        }

        let ratio = if previous.width > 0.0 {
            geometry.width / previous.width
        } else {
            0.0
        };
        let slot = self.slot_width();
        let y = geometry.middle_y();
        let left = self.showing.front().map_or(0.0, |first| first.x * ratio);
        for (i, item) in self.showing.iter_mut().enumerate() {
            item.x = left + slot * i as f64;
            surface.move_to(item.handle, item.x, Some(y));
        }
        for item in &self.hidden {
            surface.move_to(item.handle, item.x, Some(y));
        }

        let recycled = self.recycle(surface)?;
        self.rescale(surface);
        Ok(recycled)
    }

    /// Shift the visible strip by `dx`, then recycle and rescale.
    ///
    /// Returns how many recycles happened.
    pub fn scroll_by(&mut self, dx: f64, surface: &mut dyn Surface) -> Result<usize> {
        for item in self.showing.iter_mut() {
            item.x += dx;
            surface.move_to(item.handle, item.x, None);
        }
        self.offset += dx;
        let recycled = self.recycle(surface)?;
        self.rescale(surface);
        Ok(recycled)
    }

    /// Start tracking a drag.
    pub fn press(&mut self, pointer_x: f64) {
        self.drag = Some(DragAnchor {
            press_x: pointer_x,
            origin: self.offset,
        });
    }

    /// Follow the pointer while a press is active. Ignored otherwise.
    pub fn motion(&mut self, pointer_x: f64, surface: &mut dyn Surface) -> Result<usize> {
        let Some(anchor) = self.drag else {
            return Ok(0);
        };
        let target = anchor.origin + (pointer_x - anchor.press_x);
        self.scroll_by(target - self.offset, surface)
    }

    /// Stop tracking the drag.
    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn edges(&self) -> Result<(f64, f64)> {
        match (self.showing.front(), self.showing.back()) {
            (Some(first), Some(last)) => Ok((first.x, last.x)),
            _ => Err(self.fault("recycle with an empty visible window")),
        }
    }

    /// Recycle until both edges are inside their thresholds.
    ///
    /// Every rotation moves the overflowing edge one slot back toward the
    /// viewport, so the work is proportional to the shift. Whole laps around
    /// the ring are applied in one move: they are counted but not logged in
    /// [`recycled`](Self::recycled). Rotation stops if the strip overflows
    /// both edges at once instead of swinging back and forth.
    fn recycle(&mut self, surface: &mut dyn Surface) -> Result<usize> {
        let slot = self.slot_width();
        if self.working_len == 0 || slot <= 0.0 {
            return Ok(0);
        }
        self.check_partition()?;
        let half = slot / 2.0;
        let width = self.geometry.width;
        let mut count = self.skip_laps(surface)?;
        let mut direction: Option<Recycle> = None;

        loop {
            self.check_partition()?;
            let (first_x, last_x) = self.edges()?;
            let next = if first_x + half < 0.0 {
                Recycle::Left
            } else if last_x - half > width {
                Recycle::Right
            } else {
                break;
            };
            if direction.is_some_and(|previous| previous != next) {
                tracing::warn!(?next, "strip overflows both edges, leaving it in place");
                break;
            }
            direction = Some(next);
            match next {
                Recycle::Left => self.rotate_left(surface),
                Recycle::Right => self.rotate_right(surface),
            }
            count += 1;
        }
        Ok(count)
    }

    /// Shift the strip back by whole ring laps when it overflows an edge by
    /// more than one lap. Returns the number of rotations this stands for.
    fn skip_laps(&mut self, surface: &mut dyn Surface) -> Result<usize> {
        let slot = self.slot_width();
        let half = slot / 2.0;
        let lap = slot * self.working_len as f64;
        let (first_x, last_x) = self.edges()?;

        let (excess, sign) = if first_x + half < 0.0 {
            (-(first_x + half), 1.0)
        } else if last_x - half > self.geometry.width {
            (last_x - half - self.geometry.width, -1.0)
        } else {
            return Ok(0);
        };
        if !excess.is_finite() {
            return Err(self.fault("strip position is not finite"));
        }
        let laps = (excess / lap).floor();
        if laps < 1.0 {
            return Ok(0);
        }

        let shift = sign * laps * lap;
        for item in self.showing.iter_mut() {
            item.x += shift;
            surface.move_to(item.handle, item.x, None);
        }
        tracing::debug!(laps, "skipped whole laps around the ring");
        Ok(laps as usize * self.working_len)
    }

    fn rotate_left(&mut self, surface: &mut dyn Surface) {
        let Some(leaving) = self.showing.pop_front() else {
            return;
        };
        let tail_x = self.showing.back().map_or(leaving.x, |last| last.x) + self.slot_width();

        // A ring with nothing parked wraps the leaving item straight around
        let mut entering = match self.hidden.pop_front() {
            Some(next) => {
                surface.set_visible(leaving.handle, false);
                self.hidden.push_back(leaving);
                next
            }
            None => leaving,
        };

        entering.x = tail_x;
        surface.set_visible(entering.handle, true);
        surface.move_to(entering.handle, entering.x, None);
        tracing::debug!(name = %entering.record.name, x = entering.x, "recycled left");
        self.showing.push_back(entering);
        self.recycled.push(Recycle::Left);
    }

    fn rotate_right(&mut self, surface: &mut dyn Surface) {
        let Some(leaving) = self.showing.pop_back() else {
            return;
        };
        let head_x = self.showing.front().map_or(leaving.x, |first| first.x) - self.slot_width();

        let mut entering = match self.hidden.pop_back() {
            Some(next) => {
                surface.set_visible(leaving.handle, false);
                self.hidden.push_front(leaving);
                next
            }
            None => leaving,
        };

        entering.x = head_x;
        surface.set_visible(entering.handle, true);
        surface.move_to(entering.handle, entering.x, None);
        tracing::debug!(name = %entering.record.name, x = entering.x, "recycled right");
        self.showing.push_front(entering);
        self.recycled.push(Recycle::Right);
    }

    fn fault(&self, what: &str) -> Error {
        tracing::error!(
            showing = self.showing.len(),
            hidden = self.hidden.len(),
            working = self.working_len,
            "{what}"
        );
        Error::WindowInvariant(what.to_string())
    }

    fn check_partition(&self) -> Result<()> {
        let covered = self.showing.len() + self.hidden.len();
        debug_assert_eq!(covered, self.working_len, "carousel partition lost an item");
        if covered != self.working_len {
            return Err(self.fault("showing and hidden no longer cover the working set"));
        }
        Ok(())
    }

    /// Verify the window invariants: exhaustive partition, no duplicate
    /// handles, visible strip ordered left to right.
    pub fn check_invariants(&self) -> Result<()> {
        self.check_partition()?;

        let mut seen = HashSet::with_capacity(self.working_len);
        if !self
            .showing
            .iter()
            .chain(self.hidden.iter())
            .all(|item| seen.insert(item.handle))
        {
            return Err(Error::WindowInvariant("duplicate item handle".into()));
        }

        let ordered = self
            .showing
            .iter()
            .zip(self.showing.iter().skip(1))
            .all(|(a, b)| a.x < b.x);
        if !ordered {
            return Err(Error::WindowInvariant(
                "visible strip is out of order".into(),
            ));
        }
        Ok(())
    }

    /// The visible item closest to the viewport center.
    pub fn nearest_center(&self) -> Option<&RenderableItem> {
        let center = self.geometry.center_x();
        self.showing
            .iter()
            .min_by(|a, b| (a.x - center).abs().total_cmp(&(b.x - center).abs()))
    }

    /// Visible items, left to right.
    pub fn showing(&self) -> impl Iterator<Item = &RenderableItem> {
        self.showing.iter()
    }

    /// Parked items, in ring order.
    pub fn hidden(&self) -> impl Iterator<Item = &RenderableItem> {
        self.hidden.iter()
    }

    pub fn showing_len(&self) -> usize {
        self.showing.len()
    }

    pub fn hidden_len(&self) -> usize {
        self.hidden.len()
    }

    /// Size of the working set.
    pub fn len(&self) -> usize {
        self.working_len
    }

    pub fn is_empty(&self) -> bool {
        self.working_len == 0
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Cumulative horizontal shift since population.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Recycles performed since population, oldest first.
    pub fn recycled(&self) -> &[Recycle] {
        &self.recycled
    }
}
