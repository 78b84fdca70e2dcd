//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

/// Sidebar pane with a one-line status bar underneath.
pub struct AppLayout {
    pub sidebar_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // sidebar (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            sidebar_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Rows area inside the sidebar border; mouse hit-testing uses the
    /// same rectangle the widget draws into.
    pub fn sidebar_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.sidebar_area)
    }
}

/// Is the terminal cell (`col`, `row`) inside `area`?
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_is_last_line() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 40, 10));
        assert_eq!(layout.status_area, Rect::new(0, 9, 40, 1));
        assert_eq!(layout.sidebar_inner(), Rect::new(1, 1, 38, 7));
    }

    #[test]
    fn contains_excludes_far_edges() {
        let area = Rect::new(2, 2, 3, 3);
        assert!(contains(area, 2, 2));
        assert!(contains(area, 4, 4));
        assert!(!contains(area, 5, 4));
        assert!(!contains(area, 1, 3));
    }
}
