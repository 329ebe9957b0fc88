//! Expansion view state: which node ids are currently expanded

use std::collections::HashSet;

use tracing::debug;

use crate::domain::forest::Forest;
use crate::domain::locator::{all_ids, contains};

/// Label state of the single "expand all / collapse all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    AllExpanded,
    NotAllExpanded,
}

/// Set of expanded node ids.
///
/// Holds ids only, never nodes, so it outlives tree snapshots. Call
/// [`ExpansionTracker::prune`] after a snapshot swap to drop ids that vanished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionTracker {
    expanded: HashSet<String>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_ids(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Flip membership of `id`. Returns whether it is expanded afterwards.
    ///
    /// Ids absent from `forest` are ignored and never tracked.
    pub fn toggle(&mut self, forest: &Forest, id: &str) -> bool {
        if !contains(forest, id) {
            debug!("toggle: id not in tree, ignored");
            return false;
        }
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn expand_all(&mut self, forest: &Forest) {
        self.expanded = all_ids(forest).into_iter().collect();
    }

    /// Keep only the roots expanded, so the first level stays visible.
    pub fn collapse_to_roots(&mut self, forest: &Forest) {
        self.expanded = forest.root_ids().into_iter().collect();
    }

    /// Literal set comparison against the ids of `forest`.
    ///
    /// A forest without nodes has nothing to collapse and reports `NotAllExpanded`.
    pub fn state(&self, forest: &Forest) -> ExpansionState {
        if forest.is_empty() {
            return ExpansionState::NotAllExpanded;
        }
        let ids: HashSet<String> = all_ids(forest).into_iter().collect();
        if ids == self.expanded {
            ExpansionState::AllExpanded
        } else {
            ExpansionState::NotAllExpanded
        }
    }

    /// The single control: collapse when everything is expanded, expand otherwise.
    pub fn toggle_all(&mut self, forest: &Forest) -> ExpansionState {
        match self.state(forest) {
            ExpansionState::AllExpanded => self.collapse_to_roots(forest),
            ExpansionState::NotAllExpanded => self.expand_all(forest),
        }
        self.state(forest)
    }

    /// Drop ids not present in `forest`.
    pub fn prune(&mut self, forest: &Forest) {
        let present: HashSet<String> = all_ids(forest).into_iter().collect();
        let before = self.expanded.len();
        self.expanded.retain(|id| present.contains(id));
        if self.expanded.len() != before {
            debug!("prune: dropped {} stale ids", before - self.expanded.len());
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
