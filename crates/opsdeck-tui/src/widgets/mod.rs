//! Reusable rendering pieces shared by the screens.

pub mod cells;
pub mod data_table;
pub mod facet;
pub mod input;
pub mod sub_tabs;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
