//! Ratatui widget that draws the rows of an accordion render pass as an
//! indented sidebar, plus the hit-testing that maps a mouse column back to
//! the affordance glyph or the summary.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::accordion::{AccordionRow, ClickTarget};

use super::theme::Theme;

/// A render-pass row whose summary is already a styled line.
pub type SidebarRow = AccordionRow<Line<'static>>;

/// Columns of indentation per depth level.
const INDENT: u16 = 2;
/// Width of the expand/collapse slot, glyph plus gap.
const AFFORDANCE_WIDTH: u16 = 2;

// ───────────────────────────────────────── state ─────────────

/// Cursor row and scroll offset, kept across frames.
#[derive(Debug, Default)]
pub struct AccordionWidgetState {
    /// Index into the row list.
    pub cursor: usize,
    /// First visible row.
    pub offset: usize,
}

impl AccordionWidgetState {
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor on an existing row after the list shrank.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Ensure the cursor row is visible within `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor - height + 1;
        }
    }
}

/// Which gesture a click at `column` (relative to the rows area) means.
/// `None` for override rows, which have no accordion behavior.
pub fn hit_test(row: &SidebarRow, column: u16) -> Option<ClickTarget> {
    match row {
        AccordionRow::Panel {
            depth, affordance, ..
        } => {
            let start = INDENT.saturating_mul(*depth as u16);
            if *affordance && (start..start + AFFORDANCE_WIDTH).contains(&column) {
                Some(ClickTarget::Affordance)
            } else {
                Some(ClickTarget::Summary)
            }
        }
        AccordionRow::Override { .. } => None,
    }
}

// ───────────────────────────────────────── widget ────────────

pub struct AccordionWidget<'a> {
    rows: &'a [SidebarRow],
    block: Option<Block<'a>>,
}

impl<'a> AccordionWidget<'a> {
    pub fn new(rows: &'a [SidebarRow]) -> Self {
        Self { rows, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn row_line(row: &SidebarRow, is_cursor: bool) -> Line<'static> {
        match row {
            AccordionRow::Panel {
                depth,
                expanded,
                affordance,
                selected,
                summary,
                ..
            } => {
                let glyph = match (*affordance, *expanded) {
                    (false, _) => "  ",
                    (true, true) => "▼ ",
                    (true, false) => "▶ ",
                };
                let mut spans = vec![
                    Span::raw(indent(*depth)),
                    Span::styled(glyph, Theme::affordance_style()),
                ];
                spans.extend(summary.spans.iter().cloned());

                let mut line = Line::from(spans);
                if *selected {
                    line = line.patch_style(Theme::selected_style());
                    if is_cursor {
                        line = line.patch_style(Theme::selected_style().add_modifier(Modifier::UNDERLINED));
                    }
                } else if is_cursor {
                    line = line.patch_style(Theme::cursor_style());
                }
                line
            }
            AccordionRow::Override { depth, content } => {
                let mut spans = vec![Span::raw(indent(*depth))];
                spans.extend(content.spans.iter().cloned());
                let line = Line::from(spans);
                if is_cursor {
                    line.patch_style(Theme::cursor_style())
                } else {
                    line
                }
            }
        }
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT as usize)
}

impl<'a> StatefulWidget for AccordionWidget<'a> {
    type State = AccordionWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.clamp_cursor(self.rows.len());
        state.clamp_scroll(inner.height as usize);

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let line = Self::row_line(row, row_idx == state.cursor);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(id: &str, depth: usize, expanded: bool, affordance: bool) -> SidebarRow {
        AccordionRow::Panel {
            id: id.to_string(),
            depth,
            expanded,
            affordance,
            selected: false,
            summary: Line::from(id.to_string()),
        }
    }

    fn draw(rows: &[SidebarRow], height: u16, state: &mut AccordionWidgetState) -> Vec<String> {
        let area = Rect::new(0, 0, 16, height);
        let mut buf = Buffer::empty(area);
        AccordionWidget::new(rows).render(area, &mut buf, state);
        (0..height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn draws_glyphs_only_for_rows_with_affordance() {
        let rows = vec![
            panel("1", 0, true, true),
            panel("1a", 1, false, false),
            panel("2", 0, false, true),
            panel("all", 0, false, false),
        ];
        let lines = draw(&rows, 4, &mut AccordionWidgetState::default());
        assert_eq!(lines, ["▼ 1", "    1a", "▶ 2", "  all"]);
    }

    #[test]
    fn override_row_is_drawn_verbatim() {
        let rows = vec![AccordionRow::Override {
            depth: 0,
            content: Line::from("+ Find shares"),
        }];
        let lines = draw(&rows, 1, &mut AccordionWidgetState::default());
        assert_eq!(lines, ["+ Find shares"]);
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let rows: Vec<SidebarRow> = (0..5).map(|i| panel(&i.to_string(), 0, false, false)).collect();
        let mut state = AccordionWidgetState {
            cursor: 4,
            offset: 0,
        };
        let lines = draw(&rows, 2, &mut state);
        assert_eq!(state.offset, 3);
        assert_eq!(lines, ["  3", "  4"]);
    }

    #[test]
    fn cursor_clamps_when_rows_shrink() {
        let rows = vec![panel("only", 0, false, false)];
        let mut state = AccordionWidgetState {
            cursor: 7,
            offset: 5,
        };
        draw(&rows, 3, &mut state);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn hit_test_distinguishes_affordance_from_summary() {
        let nested = panel("c", 2, false, true);
        assert_eq!(hit_test(&nested, 3), Some(ClickTarget::Summary));
        assert_eq!(hit_test(&nested, 4), Some(ClickTarget::Affordance));
        assert_eq!(hit_test(&nested, 5), Some(ClickTarget::Affordance));
        assert_eq!(hit_test(&nested, 6), Some(ClickTarget::Summary));

        let leaf = panel("leaf", 0, false, false);
        assert_eq!(hit_test(&leaf, 0), Some(ClickTarget::Summary));

        let over = AccordionRow::Override {
            depth: 0,
            content: Line::from("x"),
        };
        assert_eq!(hit_test(&over, 0), None);
    }
}
