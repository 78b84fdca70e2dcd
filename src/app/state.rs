//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use crate::config::AppConfig;
use crate::core::accordion::{AccordionController, MountedState};
use crate::core::node::Node;
use crate::core::store::KeyValueStore;
use crate::ui::accordion_widget::{AccordionWidgetState, SidebarRow};
use crate::ui::theme::Theme;

pub type SidebarController = AccordionController<Box<dyn KeyValueStore>>;

/// Top-level application state.
pub struct AppState {
    /// Folder tree as supplied by the host.
    pub roots: Vec<Node>,
    pub accordion: SidebarController,
    /// Cursor and scroll.
    pub widget_state: AccordionWidgetState,
    /// Folder the host considers current.  Only changed through the
    /// accordion's selection callback.
    pub selected: Option<String>,
    /// Per-node "details" peek.  Dropped when the node unmounts.
    pub details: MountedState<bool>,
    /// Content shown in place of the reserved override node.
    pub override_line: Option<Line<'static>>,
    pub config: AppConfig,
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(roots: Vec<Node>, accordion: SidebarController, config: AppConfig) -> Self {
        Self {
            roots,
            accordion,
            widget_state: AccordionWidgetState::default(),
            selected: None,
            details: MountedState::default(),
            override_line: None,
            config,
            should_quit: false,
            status_message: None,
            terminal_area: Rect::default(),
        }
    }

    /// Run a render pass and forget transient state of nodes that are no
    /// longer rendered.
    pub fn render_pass(&mut self) -> Vec<SidebarRow> {
        let details = &self.details;
        let rows = self.accordion.render(
            &self.roots,
            self.selected.as_deref(),
            self.override_line.as_ref(),
            |node| summary_line(node, details.get(&node.id).copied().unwrap_or(false)),
        );
        self.details.retain_rendered(&rows);
        self.widget_state.clamp_cursor(rows.len());
        rows
    }

    /// Host side of the selection callback.
    pub fn apply_selection(&mut self, id: String) {
        self.status_message = Some(format!("Selected {id}"));
        self.selected = Some(id);
    }

    pub fn toggle_details(&mut self, id: &str) {
        if self.details.remove(id).is_none() {
            self.details.insert(id, true);
        }
    }
}

/// Default summary renderer: the folder label, plus id and child count
/// when details are on.
pub fn summary_line(node: &Node, details: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(node.label().to_string(), Theme::folder_style())];
    if details {
        spans.push(Span::styled(
            format!("  #{} · {} sub", node.id, node.children.len()),
            Theme::details_style(),
        ));
    }
    Line::from(spans)
}
