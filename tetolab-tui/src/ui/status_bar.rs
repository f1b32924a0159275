//! Bottom status bar — screening progress, last status message, hints.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(" 1:Table 2:Chart 3:Help", theme::muted()));
    spans.push(Span::raw(" | "));

    if app.screening {
        match &app.progress {
            Some((ticker, index, total)) => {
                spans.push(Span::styled(
                    format!("screening {} [{}/{}]", ticker, index + 1, total),
                    theme::accent(),
                ));
            }
            None => spans.push(Span::styled("screening...", theme::accent())),
        }
        spans.push(Span::raw(" | "));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    if let Some(updated) = &app.last_updated {
        spans.push(Span::styled(
            format!(" | updated {}", updated.format("%H:%M:%S")),
            theme::muted(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
