//! The external-callee allow-list (spec §6/§9): a small, exact-match set
//! of fully-qualified names assumed not to retain their pointer arguments.

use loopsentry_core::types::collections::FxHashSet;

#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: FxHashSet<String>,
}

impl AllowList {
    pub fn new(entries: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
