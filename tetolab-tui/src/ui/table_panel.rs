//! Panel 1 — Table: ranked rows colored by signal.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.visible_rows();
    let mut lines: Vec<Line> = Vec::new();

    // Header
    let filter_text = if app.filter_editing {
        format!("/{}_", app.filter)
    } else if app.filter.is_empty() {
        "(none)".to_string()
    } else {
        format!("/{}", app.filter)
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!(
                "Yield {:.0}% | {} | filter {} | ",
                app.threshold() * 100.0,
                app.divisor.label(),
                filter_text
            ),
            theme::muted(),
        ),
        Span::styled(format!("{} rows", rows.len()), theme::accent()),
        Span::styled(
            "  [j/k]scroll [/]filter [y]ield [d]ivisor [r]efresh [e]xport",
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));

    if rows.is_empty() {
        lines.push(Line::from(""));
        let hint = if app.screening {
            "Screening..."
        } else if app.report.is_none() {
            "No data yet. Press r to run the first screen."
        } else if app.filter.is_empty() {
            "Every ticker was skipped. Check the network and press r."
        } else {
            "No ticker matches the filter."
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
    } else {
        // Column headers
        lines.push(Line::from(Span::styled(
            format!(
                "{:>3} {:>10} {:>10} {:>10} {:>9} {:>7}",
                "#", "Ticker", "Price", "P_Max", "Gap", "Signal"
            ),
            theme::accent_bold(),
        )));

        // Visible window follows the cursor.
        let visible_height = (area.height.saturating_sub(4) as usize).max(1);
        let start = (app.cursor + 1).saturating_sub(visible_height);
        let end = (start + visible_height).min(rows.len());

        for (i, row) in rows.iter().enumerate().take(end).skip(start) {
            let is_cursor = i == app.cursor;
            let base = if is_cursor {
                theme::signal_style(row.signal).add_modifier(Modifier::REVERSED)
            } else {
                theme::signal_style(row.signal)
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "{:>3} {:>10} {:>10.2} {:>10.2} {:>9.2} {:>7}",
                    i + 1,
                    row.ticker,
                    row.current_price,
                    row.price_ceiling,
                    row.gap,
                    row.signal.label()
                ),
                base,
            )));
        }
    }

    // Skips, if any, below the table.
    if let Some(report) = &app.report {
        let skipped: Vec<_> = report.outcomes.iter().filter(|o| !o.is_ranked()).collect();
        if !skipped.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} ticker(s) skipped:", skipped.len()),
                theme::warning(),
            )));
            for outcome in skipped.iter().take(3) {
                lines.push(Line::from(Span::styled(
                    format!(
                        "  {} — {}",
                        outcome.ticker,
                        outcome.detail.as_deref().unwrap_or("unknown error")
                    ),
                    theme::muted(),
                )));
            }
            if skipped.len() > 3 {
                lines.push(Line::from(Span::styled(
                    format!("  ... and {} more", skipped.len() - 3),
                    theme::muted(),
                )));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
