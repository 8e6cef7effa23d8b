pub mod form;
pub mod help_bar;
pub mod nav_bar;
pub mod overlay;
pub mod search_input;

use ratatui::layout::Rect;

/// Cursor column after `len` typed characters, kept inside the input border.
pub fn cursor_x(input: Rect, len: usize) -> u16 {
    let typed = u16::try_from(len).unwrap_or(u16::MAX);
    input
        .x
        .saturating_add(1)
        .saturating_add(typed)
        .min(input.right().saturating_sub(2))
}
