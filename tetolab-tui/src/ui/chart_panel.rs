//! Panel 2 — Chart: grouped bars, current price vs ceiling per ticker.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

/// Two bars per group plus gaps.
const GROUP_WIDTH: u16 = 2 * BAR_WIDTH + 1 + 2;
const BAR_WIDTH: u16 = 8;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.visible_rows();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let max_groups = (area.width / GROUP_WIDTH.max(1)) as usize;
    let shown = rows.len().min(max_groups);

    let mut legend = vec![
        Span::styled("■ price ", theme::accent()),
        Span::styled("■ ceiling", theme::positive()),
        Span::styled(
            format!("  (top {shown} of {} by gap)", rows.len()),
            theme::muted(),
        ),
    ];
    if rows.is_empty() {
        legend = vec![Span::styled("No rows to chart.", theme::muted())];
    }
    f.render_widget(Paragraph::new(Line::from(legend)), chunks[0]);

    if rows.is_empty() {
        return;
    }

    let mut chart = BarChart::default()
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .group_gap(2);

    for row in rows.iter().take(shown) {
        let bars = [
            Bar::default()
                .value(cents(row.current_price))
                .text_value(format!("{:.1}", row.current_price))
                .style(theme::accent()),
            Bar::default()
                .value(cents(row.price_ceiling))
                .text_value(format!("{:.1}", row.price_ceiling))
                .style(theme::positive()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(short_ticker(&row.ticker)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, chunks[1]);
}

/// Bar values are integer centavos so small FII quotas still get bars.
fn cents(price: f64) -> u64 {
    (price * 100.0).round().max(0.0) as u64
}

/// Drop the exchange suffix to keep group labels inside the bar width.
fn short_ticker(ticker: &str) -> String {
    ticker.trim_end_matches(".SA").to_string()
}
