//! Theme and Colors
//!
//! Palette for the terminal surface. Node classes set by the tree builder map
//! onto these styles; everything else renders in the terminal's default colors.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Palette
// ============================================================================

/// Sky blue accent (title, last result)
pub const SKY_BLUE: Color = Color::Rgb(120, 190, 255);

/// Input text
pub const INPUT_FG: Color = Color::Rgb(130, 220, 130);

/// Loading indicator
pub const LOADING_YELLOW: Color = Color::Rgb(255, 223, 128);

/// Error text
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Hints and separators
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Background of the focused control
pub const FOCUS_BG: Color = Color::Rgb(60, 90, 140);

// ============================================================================
// Class Styles
// ============================================================================

/// Text style for a node class
#[must_use]
pub fn class_style(class: Option<&str>) -> Style {
    match class {
        Some("error") => Style::default().fg(ERROR_RED),
        Some("loading") => Style::default()
            .fg(LOADING_YELLOW)
            .add_modifier(Modifier::ITALIC),
        Some("search-result") => Style::default().fg(SKY_BLUE),
        Some("location") => Style::default().fg(INPUT_FG),
        Some("primary") => Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD),
        Some("delete") => Style::default().fg(ERROR_RED),
        _ => Style::default(),
    }
}

/// Style applied on top of a focused control
#[must_use]
pub fn focus_style(base: Style) -> Style {
    base.bg(FOCUS_BG).add_modifier(Modifier::BOLD)
}

/// Style for hint lines
#[must_use]
pub fn hint_style() -> Style {
    Style::default().fg(DIM_GRAY)
}
