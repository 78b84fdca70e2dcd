//! Folder tree data model.
//!
//! Unlike a filesystem walk, the sidebar tree arrives fully formed from the
//! host, so nodes own their children directly.  A tree file is a JSON array
//! of root [`Node`]s.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

/// Id of the aggregate "all calendars" entry.  It never gets an expand
/// affordance, even when it carries children.
pub const ALL_FOLDER_ID: &str = "all";

/// Default reserved id whose position is filled by host-supplied content
/// (the "find shares" action) instead of an accordion.
pub const FIND_SHARES_ID: &str = "find_shares";

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("failed to read folder tree: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed folder tree: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
}

// ───────────────────────────────────────── node ──────────────

/// A single folder in the sidebar tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node {
    /// Unique across the whole tree, not just among siblings.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Label shown in the summary; falls back to the id for unnamed nodes.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Depth-first lookup of `id` in this node's subtree (itself included).
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Pre-order list of every id in this subtree.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

// ───────────────────────────────────────── forest ────────────

/// Look `id` up across a sequence of roots.
pub fn find_in<'a>(roots: &'a [Node], id: &str) -> Option<&'a Node> {
    roots.iter().find_map(|r| r.find(id))
}

/// Reject trees whose ids are not unique across all levels.
pub fn validate_unique_ids(roots: &[Node]) -> Result<(), TreeError> {
    let mut seen = HashSet::new();
    for root in roots {
        for id in root.ids() {
            if !seen.insert(id) {
                return Err(TreeError::DuplicateId(id.to_string()));
            }
        }
    }
    Ok(())
}

/// Parse a folder tree from its JSON text.
pub fn parse_tree(json: &str) -> Result<Vec<Node>, TreeError> {
    let roots: Vec<Node> = serde_json::from_str(json)?;
    validate_unique_ids(&roots)?;
    Ok(roots)
}

pub fn load_tree(path: &Path) -> Result<Vec<Node>, TreeError> {
    let contents = std::fs::read_to_string(path)?;
    parse_tree(&contents)
}

/// Built-in calendar sidebar used when no tree file is given.
pub fn demo_tree() -> Vec<Node> {
    vec![
        Node::new("1", "My calendars").with_children(vec![
            Node::new("10", "Calendar"),
            Node::new("11", "Work").with_children(vec![
                Node::new("111", "Meetings"),
                Node::new("112", "On call"),
            ]),
            Node::new("12", "Holidays"),
        ]),
        Node::new("2", "Shared calendars").with_children(vec![
            Node::new("21", "Team"),
            Node::new("22", "Rooms").with_children(vec![Node::new("221", "Room A")]),
        ]),
        Node::new(ALL_FOLDER_ID, "All calendars").with_children(vec![Node::new("all-1", "Everything")]),
        Node::new(FIND_SHARES_ID, "Find shares"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_tree_and_defaults_missing_fields() {
        let roots = parse_tree(r#"[{"id":"1","name":"Mine","children":[{"id":"1a"}]},{"id":"all"}]"#)
            .unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children[0].id, "1a");
        assert_eq!(roots[0].children[0].label(), "1a");
        assert!(!roots[1].has_children());
    }

    #[test]
    fn duplicate_ids_across_levels_are_rejected() {
        let err = parse_tree(r#"[{"id":"1","children":[{"id":"2"}]},{"id":"2"}]"#).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateId(id) if id == "2"));
    }

    #[test]
    fn find_searches_whole_forest() {
        let roots = demo_tree();
        assert_eq!(find_in(&roots, "221").map(|n| n.label()), Some("Room A"));
        assert!(find_in(&roots, "missing").is_none());
    }

    #[test]
    fn demo_tree_ids_are_unique() {
        assert!(validate_unique_ids(&demo_tree()).is_ok());
    }
}
