//! One-line terminal rendering of the command buffer.

use namedraw_engine::CommandBuffer;

/// Render the visible items left to right. Items near full size are
/// bracketed, mid-size items are shown plain, the rest collapse to a dot.
pub fn frame(buffer: &CommandBuffer, max_font_size: u32) -> String {
    let max = f64::from(max_font_size.max(1));
    buffer
        .visible_items()
        .into_iter()
        .filter(|(_, item)| !item.text.is_empty())
        .map(|(_, item)| {
            let weight = f64::from(item.font_size) / max;
            if weight >= 0.75 {
                format!("[{}]", item.text)
            } else if weight >= 0.25 {
                item.text.clone()
            } else {
                "·".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
