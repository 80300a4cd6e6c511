//! Nursery palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const LAVENDER: Color = Color::Rgb(183, 148, 246); // #b794f6
pub const SKY: Color = Color::Rgb(137, 220, 235); // #89dceb
pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387
pub const MINT: Color = Color::Rgb(148, 226, 164); // #94e2a4
pub const BUTTER: Color = Color::Rgb(249, 226, 175); // #f9e2af
pub const ROSE: Color = Color::Rgb(243, 139, 168); // #f38ba8

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

/// Border for a panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Field label ("Naps", "Last change", ...).
pub fn label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Field value.
pub fn value() -> Style {
    Style::default().fg(SKY)
}

/// Emphasized value.
pub fn value_strong() -> Style {
    Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)
}

/// Muted text for placeholders ("no data yet", "--").
pub fn muted() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Error text in the status bar and panel titles.
pub fn error() -> Style {
    Style::default().fg(ROSE)
}

/// Success flash in the status bar.
pub fn success() -> Style {
    Style::default().fg(MINT)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}
