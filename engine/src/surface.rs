//! Presentation boundary.
//!
//! The engine never lays out or styles anything. It talks to a [`Surface`]
//! through a handful of item commands and geometry queries; the host owns the
//! actual rendering. [`CommandBuffer`] is a surface that records those
//! commands as a serializable stream and mirrors the resulting item state, for
//! hosts that render out of process (FFI, terminal) and for tests.

use crate::ItemHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Viewport size in surface units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal center of the viewport.
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Vertical middle, where carousel items sit.
    pub fn middle_y(&self) -> f64 {
        self.height * 0.5
    }
}

/// Rendering surface driven by the drawers.
pub trait Surface {
    /// Create a text item and return its handle. New items are visible.
    fn create_item(&mut self, text: &str) -> ItemHandle;

    /// Destroy an item. Unknown handles are ignored.
    fn destroy_item(&mut self, handle: ItemHandle);

    fn set_text(&mut self, handle: ItemHandle, text: &str);

    fn set_visible(&mut self, handle: ItemHandle, visible: bool);

    fn set_font_size(&mut self, handle: ItemHandle, size: u32);

    /// Move an item's anchor. `None` keeps the current vertical position.
    fn move_to(&mut self, handle: ItemHandle, x: f64, y: Option<f64>);

    /// Current viewport geometry.
    fn geometry(&self) -> Geometry;

    /// Horizontal position the surface currently renders an item at.
    fn item_position(&self, handle: ItemHandle) -> Option<f64>;
}

/// One recorded surface command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Create {
        handle: ItemHandle,
        text: String,
    },
    Destroy {
        handle: ItemHandle,
    },
    SetText {
        handle: ItemHandle,
        text: String,
    },
    SetVisible {
        handle: ItemHandle,
        visible: bool,
    },
    SetFontSize {
        handle: ItemHandle,
        size: u32,
    },
    MoveTo {
        handle: ItemHandle,
        x: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
}

/// Mirrored state of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemState {
    pub text: String,
    pub visible: bool,
    pub font_size: u32,
    pub x: f64,
    pub y: f64,
}

/// A [`Surface`] that records commands and mirrors item state.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    geometry: Geometry,
    next_handle: ItemHandle,
    items: BTreeMap<ItemHandle, ItemState>,
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    /// Create a buffer for a viewport of the given size.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            next_handle: 1,
            ..Self::default()
        }
    }

    /// Update the viewport size reported by [`Surface::geometry`].
    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry = Geometry::new(width, height);
    }

    /// Take every command recorded since the last drain.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands recorded since the last drain.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Mirrored state of an item.
    pub fn item(&self, handle: ItemHandle) -> Option<&ItemState> {
        self.items.get(&handle)
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible items ordered left to right.
    pub fn visible_items(&self) -> Vec<(ItemHandle, &ItemState)> {
        let mut visible: Vec<_> = self
            .items
            .iter()
            .filter(|(_, item)| item.visible)
            .map(|(handle, item)| (*handle, item))
            .collect();
        visible.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        visible
    }
}

impl Surface for CommandBuffer {
    fn create_item(&mut self, text: &str) -> ItemHandle {
        let handle = self.next_handle.max(1);
        self.next_handle = handle + 1;
        self.items.insert(
            handle,
            ItemState {
                text: text.to_string(),
                visible: true,
                font_size: 0,
                x: 0.0,
                y: 0.0,
            },
        );
        self.commands.push(DrawCommand::Create {
            handle,
            text: text.to_string(),
        });
        handle
    }

    fn destroy_item(&mut self, handle: ItemHandle) {
        if self.items.remove(&handle).is_some() {
            self.commands.push(DrawCommand::Destroy { handle });
        }
    }

    fn set_text(&mut self, handle: ItemHandle, text: &str) {
        if let Some(item) = self.items.get_mut(&handle) {
            item.text = text.to_string();
            self.commands.push(DrawCommand::SetText {
                handle,
                text: text.to_string(),
            });
        }
    }

    fn set_visible(&mut self, handle: ItemHandle, visible: bool) {
        if let Some(item) = self.items.get_mut(&handle) {
            item.visible = visible;
            self.commands
                .push(DrawCommand::SetVisible { handle, visible });
        }
    }

    fn set_font_size(&mut self, handle: ItemHandle, size: u32) {
        if let Some(item) = self.items.get_mut(&handle) {
            item.font_size = size;
            self.commands.push(DrawCommand::SetFontSize { handle, size });
        }
    }

    fn move_to(&mut self, handle: ItemHandle, x: f64, y: Option<f64>) {
        if let Some(item) = self.items.get_mut(&handle) {
            item.x = x;
            if let Some(y) = y {
                item.y = y;
            }
            self.commands.push(DrawCommand::MoveTo { handle, x, y });
        }
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn item_position(&self, handle: ItemHandle) -> Option<f64> {
        self.items.get(&handle).map(|item| item.x)
    }
}
