//! Accordion tree controller.
//!
//! Owns the [`ExpansionState`] for one storage key and turns a forest of
//! [`Node`]s into the flat list of rows a front-end draws.  Expansion is
//! read from the store once, at mount, and written back in full on every
//! toggle.  Toggling is the only way the state changes.

use std::collections::HashMap;

use super::expansion::ExpansionState;
use super::node::{Node, ALL_FOLDER_ID, FIND_SHARES_ID};
use super::store::KeyValueStore;

/// Mount-time inputs shared by every level of the tree.
#[derive(Debug, Clone)]
pub struct AccordionProps {
    /// Namespaces the persisted expansion state.
    pub storage_key: String,
    /// Used only when the store has nothing under `storage_key`.
    pub initial_expanded: Option<Vec<String>>,
    /// Node id replaced by host-supplied content.
    pub override_id: String,
}

impl AccordionProps {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            initial_expanded: None,
            override_id: FIND_SHARES_ID.to_string(),
        }
    }

    pub fn initial_expanded(mut self, ids: Vec<String>) -> Self {
        self.initial_expanded = Some(ids);
        self
    }

    pub fn override_id(mut self, id: impl Into<String>) -> Self {
        self.override_id = id.into();
        self
    }
}

/// Which part of a node's summary received the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The expand/collapse glyph.
    Affordance,
    /// Anywhere else on the summary.
    Summary,
}

/// One row of a render pass, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum AccordionRow<C> {
    Panel {
        id: String,
        depth: usize,
        expanded: bool,
        /// Whether an expand/collapse glyph is offered.
        affordance: bool,
        /// Matches the host's selected id.
        selected: bool,
        summary: C,
    },
    /// Host content injected in place of the reserved node.
    Override { depth: usize, content: C },
}

impl<C> AccordionRow<C> {
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        match self {
            Self::Panel { depth, .. } | Self::Override { depth, .. } => *depth,
        }
    }

    /// Node id for panel rows; override rows carry none.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Panel { id, .. } => Some(id),
            Self::Override { .. } => None,
        }
    }
}

type SelectCallback = Box<dyn FnMut(&str)>;

// ───────────────────────────────────────── controller ────────

pub struct AccordionController<S: KeyValueStore> {
    store: S,
    props: AccordionProps,
    expansion: ExpansionState,
    on_select: Option<SelectCallback>,
}

impl<S: KeyValueStore> AccordionController<S> {
    /// Read the persisted expansion state, falling back to the initial set.
    pub fn mount(store: S, props: AccordionProps) -> Self {
        let expansion = match store.get(&props.storage_key) {
            Some(ids) => ExpansionState::from(ids),
            None => ExpansionState::from(props.initial_expanded.clone().unwrap_or_default()),
        };
        tracing::debug!(
            key = %props.storage_key,
            expanded = expansion.len(),
            "accordion mounted"
        );
        Self {
            store,
            props,
            expansion,
            on_select: None,
        }
    }

    /// Install the callback fired when a node's summary is clicked.
    pub fn on_select(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.props.storage_key
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expansion.contains(id)
    }

    pub fn has_affordance(&self, node: &Node) -> bool {
        node.has_children() && node.id != ALL_FOLDER_ID
    }

    pub fn is_override(&self, node: &Node) -> bool {
        node.id == self.props.override_id
    }

    /// Flip expansion of `id` and persist the full set.  Returns the new
    /// membership.  A failed write is logged; the in-memory state still
    /// changes.
    pub fn toggle(&mut self, id: &str) -> bool {
        let expanded = self.expansion.toggle(id);
        if let Err(e) = self.store.set(&self.props.storage_key, self.expansion.as_slice()) {
            tracing::warn!("failed to persist expansion state: {e}");
        }
        tracing::debug!(id, expanded, "accordion toggled");
        expanded
    }

    /// Dispatch a click.  The affordance only toggles; the summary only
    /// selects.
    pub fn click(&mut self, id: &str, target: ClickTarget) {
        match target {
            ClickTarget::Affordance => {
                self.toggle(id);
            }
            ClickTarget::Summary => self.select(id),
        }
    }

    fn select(&mut self, id: &str) {
        tracing::debug!(id, "accordion selected");
        if let Some(callback) = self.on_select.as_mut() {
            callback(id);
        }
    }

    /// Render pass over `roots`.  `summary` is called once per visible
    /// node.  Collapsed subtrees contribute no rows.  The reserved node
    /// renders `override_content` verbatim, or nothing when absent.
    pub fn render<C, F>(
        &self,
        roots: &[Node],
        selected: Option<&str>,
        override_content: Option<&C>,
        mut summary: F,
    ) -> Vec<AccordionRow<C>>
    where
        C: Clone,
        F: FnMut(&Node) -> C,
    {
        let mut rows = Vec::new();
        self.render_level(roots, 0, selected, override_content, &mut summary, &mut rows);
        rows
    }

    fn render_level<C, F>(
        &self,
        nodes: &[Node],
        depth: usize,
        selected: Option<&str>,
        override_content: Option<&C>,
        summary: &mut F,
        rows: &mut Vec<AccordionRow<C>>,
    ) where
        C: Clone,
        F: FnMut(&Node) -> C,
    {
        for node in nodes {
            if self.is_override(node) {
                if let Some(content) = override_content {
                    rows.push(AccordionRow::Override {
                        depth,
                        content: content.clone(),
                    });
                }
                continue;
            }

            let expanded = self.is_expanded(&node.id);
            rows.push(AccordionRow::Panel {
                id: node.id.clone(),
                depth,
                expanded,
                affordance: self.has_affordance(node),
                selected: selected == Some(node.id.as_str()),
                summary: summary(node),
            });

            if expanded && node.has_children() {
                self.render_level(
                    &node.children,
                    depth + 1,
                    selected,
                    override_content,
                    summary,
                    rows,
                );
            }
        }
    }
}

// ───────────────────────────────────────── mount tracking ────

/// Per-node transient state that lives only while the node is rendered.
///
/// Call [`MountedState::retain_rendered`] after each render pass: entries
/// for nodes that produced no row (e.g. under a collapsed parent) are
/// dropped, so re-expanding starts from scratch.
#[derive(Debug, Clone)]
pub struct MountedState<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for MountedState<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> MountedState<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: &str, value: T) {
        self.entries.insert(id.to_string(), value);
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.entries.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retain_rendered<C>(&mut self, rows: &[AccordionRow<C>]) {
        self.entries
            .retain(|id, _| rows.iter().any(|r| r.id() == Some(id.as_str())));
    }
}
