//! Input handling: maps key/mouse events to accordion gestures.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::accordion::{AccordionRow, ClickTarget};
use crate::ui::accordion_widget::hit_test;
use crate::ui::layout::{self, AppLayout};

use super::event::AppEvent;
use super::state::AppState;

pub fn handle_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Key(k) => handle_key(state, k),
        AppEvent::Mouse(m) => handle_mouse(state, m),
        AppEvent::Resize(w, h) => state.terminal_area = Rect::new(0, 0, w, h),
        AppEvent::Selected(id) => state.apply_selection(id),
        AppEvent::InputClosed => {
            tracing::warn!("terminal input closed, shutting down");
            state.should_quit = true;
        }
        AppEvent::Tick => {}
    }
}

pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::MoveUp => state.widget_state.select_prev(),
        Action::MoveDown => {
            let len = state.render_pass().len();
            state.widget_state.select_next(len);
        }
        Action::Toggle => {
            // Keyboard toggle only applies where the glyph is shown.
            if let Some((id, true)) = cursor_panel(state) {
                state.accordion.click(&id, ClickTarget::Affordance);
            }
        }
        Action::Select => {
            if let Some((id, _)) = cursor_panel(state) {
                state.accordion.click(&id, ClickTarget::Summary);
            }
        }
        Action::Details => {
            if let Some((id, _)) = cursor_panel(state) {
                state.toggle_details(&id);
            }
        }
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let inner = AppLayout::from_area(state.terminal_area).sidebar_inner();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !layout::contains(inner, mouse.column, mouse.row) {
                return;
            }
            let index = (mouse.row - inner.y) as usize + state.widget_state.offset;
            let rows = state.render_pass();
            let Some(row) = rows.get(index) else {
                return;
            };
            state.widget_state.cursor = index;

            let target = hit_test(row, mouse.column - inner.x);
            if let (Some(id), Some(target)) = (row.id(), target) {
                state.accordion.click(id, target);
            }
        }
        MouseEventKind::ScrollUp => state.widget_state.select_prev(),
        MouseEventKind::ScrollDown => {
            let len = state.render_pass().len();
            state.widget_state.select_next(len);
        }
        _ => {}
    }
}

/// Id of the panel under the cursor and whether it offers an affordance.
fn cursor_panel(state: &mut AppState) -> Option<(String, bool)> {
    let rows = state.render_pass();
    match rows.into_iter().nth(state.widget_state.cursor)? {
        AccordionRow::Panel { id, affordance, .. } => Some((id, affordance)),
        AccordionRow::Override { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::app::event;
    use crate::config::AppConfig;
    use crate::core::accordion::{AccordionController, AccordionProps};
    use crate::core::node::Node;
    use crate::core::store::{KeyValueStore, MemoryStore};

    fn tree() -> Vec<Node> {
        vec![
            Node::new("1", "One").with_children(vec![
                Node::new("1a", "One A").with_children(vec![Node::new("1a-x", "Deep")]),
            ]),
            Node::new("all", "All").with_children(vec![Node::new("all-1", "Hidden")]),
        ]
    }

    fn app() -> (AppState, tokio::sync::mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = event::channel();
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let accordion = AccordionController::mount(store, AccordionProps::new("test"))
            .on_select(move |id| {
                let _ = tx.send(AppEvent::Selected(id.to_string()));
            });
        let mut state = AppState::new(tree(), accordion, AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 30, 10);
        (state, rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn visible_ids(state: &mut AppState) -> Vec<String> {
        state
            .render_pass()
            .iter()
            .filter_map(|r| r.id().map(str::to_string))
            .collect()
    }

    #[test]
    fn toggle_key_expands_cursor_row() {
        let (mut state, mut rx) = app();

        handle_key(&mut state, press(KeyCode::Char(' ')));

        assert_eq!(visible_ids(&mut state), ["1", "1a", "all"]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn toggle_key_ignores_all_folder() {
        let (mut state, _rx) = app();
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Char(' ')));

        assert!(state.accordion.expansion().is_empty());
        assert_eq!(visible_ids(&mut state), ["1", "all"]);
    }

    #[test]
    fn select_key_goes_through_callback() {
        let (mut state, mut rx) = app();
        handle_key(&mut state, press(KeyCode::Enter));

        let ev = rx.try_recv().unwrap();
        handle_event(&mut state, ev);
        assert_eq!(state.selected.as_deref(), Some("1"));
        assert!(state.accordion.expansion().is_empty());
    }

    #[test]
    fn clicking_glyph_toggles_and_clicking_label_selects() {
        let (mut state, mut rx) = app();

        // Row 0 of the sidebar sits at y=1 inside the border; glyph at x=1..3.
        handle_mouse(&mut state, click(1, 1));
        assert!(state.accordion.is_expanded("1"));
        assert!(rx.try_recv().is_err());

        handle_mouse(&mut state, click(6, 2));
        assert_eq!(state.widget_state.cursor, 1);
        match rx.try_recv().unwrap() {
            AppEvent::Selected(id) => assert_eq!(id, "1a"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(!state.accordion.is_expanded("1a"));
    }

    #[test]
    fn clicks_outside_rows_are_ignored() {
        let (mut state, mut rx) = app();
        handle_mouse(&mut state, click(1, 8));
        handle_mouse(&mut state, click(0, 1));

        assert!(state.accordion.expansion().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn details_reset_after_parent_collapse() {
        let (mut state, _rx) = app();
        handle_key(&mut state, press(KeyCode::Char(' ')));
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Char('i')));
        assert_eq!(state.details.get("1a"), Some(&true));

        handle_key(&mut state, press(KeyCode::Up));
        handle_key(&mut state, press(KeyCode::Char(' ')));
        state.render_pass();
        assert!(state.details.is_empty());

        handle_key(&mut state, press(KeyCode::Char(' ')));
        assert_eq!(visible_ids(&mut state), ["1", "1a", "all"]);
        assert_eq!(state.details.get("1a"), None);
    }

    #[test]
    fn closed_input_ends_the_session() {
        let (mut state, _rx) = app();
        handle_event(&mut state, AppEvent::Tick);
        assert!(!state.should_quit);

        handle_event(&mut state, AppEvent::InputClosed);
        assert!(state.should_quit);
    }

    #[test]
    fn quit_keys() {
        let (mut state, _rx) = app();
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
    }
}
