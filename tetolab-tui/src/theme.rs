//! Color tokens and style helpers for the screen table.
//!
//! The signal colors mirror the snapshot workbook: positive green for
//! BUY, yellow for an exact tie, red for WAIT. Everything styling a row
//! goes through [`signal_style`] so the terminal and the spreadsheet
//! read the same way.

use ratatui::style::{Color, Modifier, Style};
use tetolab_core::domain::Signal;

pub const ACCENT: Color = Color::Cyan;
pub const POSITIVE: Color = Color::Green;
pub const NEGATIVE: Color = Color::Red;
pub const WARNING: Color = Color::Yellow;
pub const MUTED: Color = Color::DarkGray;
pub const TEXT: Color = Color::Gray;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    }
}

/// Row style for a classified signal.
pub fn signal_style(signal: Signal) -> Style {
    match signal {
        Signal::Buy => positive(),
        Signal::Equal => warning(),
        Signal::Wait => negative(),
    }
}
