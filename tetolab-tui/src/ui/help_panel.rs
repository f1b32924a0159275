//! Panel 3 — Help: keyboard shortcuts and methodology notes.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

fn section(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn entry(lines: &mut Vec<Line<'static>>, key: &'static str, desc: &'static str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {key:<10}"), theme::accent()),
        Span::styled(desc, theme::text()),
    ]));
}

fn note(lines: &mut Vec<Line<'static>>, text: &'static str) {
    lines.push(Line::from(Span::styled(text, theme::text())));
}

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Navigation");
    entry(&mut lines, "1/2/3", "jump to Table / Chart / Help");
    entry(&mut lines, "Tab", "next panel (Shift-Tab: previous)");
    entry(&mut lines, "j/k", "move the table cursor");
    entry(&mut lines, "g/G", "jump to top / bottom");
    entry(&mut lines, "q", "quit");

    section(&mut lines, "Screening");
    entry(&mut lines, "r", "refresh quotes and re-rank");
    entry(&mut lines, "y", "cycle yield threshold (6/7/8/9%)");
    entry(&mut lines, "d", "toggle annualization divisor");
    entry(&mut lines, "/", "filter tickers (Enter keeps, Esc clears)");
    entry(&mut lines, "e", "export the snapshot workbook");

    section(&mut lines, "Method");
    note(&mut lines, "  The ceiling is the trailing dividend total, annualized over");
    note(&mut lines, "  the window, divided by the yield threshold. Green rows trade");
    note(&mut lines, "  under their ceiling, red rows above it, yellow exactly on it.");
    note(&mut lines, "  Tickers with failed lookups are skipped, never ranked.");

    f.render_widget(Paragraph::new(lines), area);
}
