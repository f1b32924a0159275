//! Keyboard input dispatch — filter prompt → global keys → panel keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. The filter prompt consumes input first.
    if app.filter_editing {
        handle_filter_key(app, key);
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Table;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::Char('3') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.request_screen();
            return;
        }
        KeyCode::Char('y') => {
            app.cycle_threshold();
            return;
        }
        KeyCode::Char('d') => {
            app.toggle_divisor();
            return;
        }
        KeyCode::Char('e') => {
            export_snapshot(app);
            return;
        }
        KeyCode::Char('/') => {
            app.filter_editing = true;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Table => handle_table_key(app, key),
        Panel::Chart | Panel::Help => {}
    }
}

fn handle_filter_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.filter.clear();
            app.filter_editing = false;
            app.clamp_cursor();
        }
        KeyCode::Enter => {
            app.filter_editing = false;
            app.clamp_cursor();
        }
        KeyCode::Backspace => {
            app.filter.pop();
            app.clamp_cursor();
        }
        KeyCode::Char(c) => {
            app.filter.push(c);
            app.clamp_cursor();
        }
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') => {
            app.cursor = 0;
        }
        KeyCode::Char('G') => {
            let len = app.visible_rows().len();
            app.cursor = len.saturating_sub(1);
        }
        _ => {}
    }
}

/// Write the last report to the default workbook path. A sink failure is
/// fatal to the export only — the table stays up.
fn export_snapshot(app: &mut AppState) {
    use tetolab_report::{SnapshotSink, XlsxSink};

    let Some(report) = app.report.clone() else {
        app.set_warning("nothing to export yet — run a screen first".to_string());
        return;
    };
    let path = std::path::PathBuf::from("acoes.xlsx");
    match XlsxSink::new(&path).replace(&report) {
        Ok(()) => app.set_status(format!("Snapshot written to {}", path.display())),
        Err(e) => app.set_error(format!("export failed: {e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{WorkerCommand, WorkerResponse};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> (
        AppState,
        mpsc::Receiver<WorkerCommand>,
        mpsc::Sender<WorkerResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let state = AppState::new(cmd_tx, resp_rx, vec!["PETR4.SA".into()]);
        (state, cmd_rx, resp_tx)
    }

    #[test]
    fn q_quits_outside_the_filter_prompt() {
        let (mut a, _rx, _tx) = app();
        handle_key(&mut a, press(KeyCode::Char('q')));
        assert!(!a.running);
    }

    #[test]
    fn filter_prompt_captures_characters_including_q() {
        let (mut a, _rx, _tx) = app();
        handle_key(&mut a, press(KeyCode::Char('/')));
        assert!(a.filter_editing);
        handle_key(&mut a, press(KeyCode::Char('q')));
        assert!(a.running, "q must be typed into the filter, not quit");
        assert_eq!(a.filter, "q");
        handle_key(&mut a, press(KeyCode::Enter));
        assert!(!a.filter_editing);
        assert_eq!(a.filter, "q");
    }

    #[test]
    fn esc_clears_the_filter() {
        let (mut a, _rx, _tx) = app();
        handle_key(&mut a, press(KeyCode::Char('/')));
        handle_key(&mut a, press(KeyCode::Char('p')));
        handle_key(&mut a, press(KeyCode::Esc));
        assert!(a.filter.is_empty());
        assert!(!a.filter_editing);
    }

    #[test]
    fn tab_cycles_panels() {
        let (mut a, _rx, _tx) = app();
        handle_key(&mut a, press(KeyCode::Tab));
        assert_eq!(a.active_panel, Panel::Chart);
        handle_key(&mut a, press(KeyCode::BackTab));
        assert_eq!(a.active_panel, Panel::Table);
    }
}
