//! The set of expanded node ids.
//!
//! Stored as an ordered list so the persisted value reads back the way it
//! was written, but treated as a set: no duplicates, and membership is all
//! that matters.  Ids of nodes no longer in the tree are kept as-is; they
//! simply never match during a render pass.

/// Ids of the nodes currently rendered expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    ids: Vec<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Add `id`; a no-op when already present.
    pub fn open(&mut self, id: &str) {
        if !self.contains(id) {
            self.ids.push(id.to_string());
        }
    }

    /// Remove `id`.  Every other id is left untouched.
    pub fn close(&mut self, id: &str) {
        self.ids.retain(|i| i != id);
    }

    /// Flip membership of `id` and return whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.close(id);
            false
        } else {
            self.open(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl From<Vec<String>> for ExpansionState {
    /// Duplicates collapse onto their first occurrence.
    fn from(ids: Vec<String>) -> Self {
        let mut state = Self::new();
        for id in &ids {
            state.open(id);
        }
        state
    }
}
