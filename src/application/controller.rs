//! Selection and sync controller
//!
//! Owns one hierarchy view: the current snapshot, the selected node and the
//! expansion state. Every write entry point swaps in a new snapshot and then
//! reconciles selection and expansion against it, so neither ever refers to a
//! node that no longer exists.

use tracing::{debug, info, instrument, trace, warn};

use crate::application::services::{HierarchySync, SnapshotCache};
use crate::application::ApplicationResult;
use crate::domain::{
    approve_all, delete_subtree, find_by_id, set_approval_status, ApprovalStatus,
    ExpansionState, ExpansionTracker, Forest, TreeNode, TreeRender,
};

/// Version captured when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    version: u64,
}

impl LoadTicket {
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched snapshot replaced the current one
    Adopted,
    /// A local edit happened while the load was in flight; the result was dropped
    Stale,
}

/// One hierarchy view with its own selection and expansion state.
///
/// Loads are not coalesced: callers must not start a second load while one is
/// outstanding.
pub struct HierarchyController {
    sync: HierarchySync,
    cache: Option<SnapshotCache>,
    forest: Option<Forest>,
    selected: Option<TreeNode>,
    expansion: ExpansionTracker,
    /// Incremented on every local edit that changed the snapshot
    version: u64,
}

impl HierarchyController {
    pub fn new(sync: HierarchySync, cache: Option<SnapshotCache>) -> Self {
        Self {
            sync,
            cache,
            forest: None,
            selected: None,
            expansion: ExpansionTracker::new(),
            version: 0,
        }
    }

    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref()
    }

    pub fn selected(&self) -> Option<&TreeNode> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|node| node.id.as_str())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn expansion(&self) -> &ExpansionTracker {
        &self.expansion
    }

    pub fn expansion_state(&self) -> ExpansionState {
        match &self.forest {
            Some(forest) => self.expansion.state(forest),
            None => ExpansionState::NotAllExpanded,
        }
    }

    // ============================================================
    // Loading
    // ============================================================

    /// Show the cached snapshot while no tree is present.
    ///
    /// Advisory only: it neither counts as a load nor bumps the version, so a
    /// subsequent [`load`](Self::load) still runs the full sync/fetch pair.
    pub fn warm_start(&mut self) -> bool {
        if self.forest.is_some() {
            return false;
        }
        let Some(snapshot) = self.cache.as_ref().and_then(SnapshotCache::load) else {
            return false;
        };
        debug!("warm_start: cached snapshot from {}", snapshot.saved_at);
        self.forest = Some(snapshot.tree);
        self.reconcile();
        true
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            version: self.version,
        }
    }

    /// Adopt or discard the result of a load started with `ticket`.
    ///
    /// Failures are returned and leave the current tree and selection untouched.
    /// A result that arrives after a local edit is discarded as [`LoadOutcome::Stale`].
    #[instrument(level = "debug", skip(self, result))]
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ApplicationResult<Forest>,
    ) -> ApplicationResult<LoadOutcome> {
        let forest = result?;

        if ticket.version != self.version {
            debug!(
                "finish_load: discarding stale snapshot (started at v{}, now v{})",
                ticket.version, self.version
            );
            return Ok(LoadOutcome::Stale);
        }

        info!(
            "finish_load: adopted snapshot with {} nodes",
            forest.len()
        );
        trace!("finish_load:\n{}", forest.to_tree_string());

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&forest) {
                warn!("finish_load: could not cache snapshot: {}", e);
            }
        }

        self.forest = Some(forest);
        self.reconcile();
        Ok(LoadOutcome::Adopted)
    }

    /// Sync relationships, fetch the hierarchy and adopt it.
    pub fn load(&mut self) -> ApplicationResult<LoadOutcome> {
        let ticket = self.begin_load();
        let result = self.sync.fetch_snapshot();
        self.finish_load(ticket, result)
    }

    // ============================================================
    // Selection
    // ============================================================

    /// Select node `id`. Absent ids leave the selection as it is.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: &str) -> bool {
        let Some(node) = self.forest.as_ref().and_then(|f| find_by_id(f, id)) else {
            debug!("select: {} not present", id);
            return false;
        };
        self.selected = Some(node.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ============================================================
    // Mutations
    // ============================================================

    #[instrument(level = "debug", skip(self))]
    pub fn approve(&mut self, id: &str) -> bool {
        self.apply(|forest| Some(set_approval_status(forest, id, ApprovalStatus::Approved)))
    }

    /// Reject `id` and everything beneath it.
    #[instrument(level = "debug", skip(self))]
    pub fn reject(&mut self, id: &str) -> bool {
        self.apply(|forest| Some(set_approval_status(forest, id, ApprovalStatus::Rejected)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn approve_all(&mut self) -> bool {
        self.apply(|forest| Some(approve_all(forest)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> bool {
        self.apply(|forest| delete_subtree(forest, id))
    }

    /// Run a mutation against the current snapshot and swap in its result.
    ///
    /// Returns false when there is no tree or the mutation hit no node.
    fn apply<F>(&mut self, mutation: F) -> bool
    where
        F: FnOnce(&Forest) -> Option<Forest>,
    {
        let Some(current) = &self.forest else {
            return false;
        };
        let next = mutation(current);
        if let Some(next) = &next {
            if next.same_snapshot(current) {
                return false;
            }
        }

        self.forest = next;
        self.version += 1;
        self.reconcile();
        true
    }

    /// Re-resolve the selection by id and drop expansion ids that vanished.
    fn reconcile(&mut self) {
        match &self.forest {
            Some(forest) => {
                self.selected = self
                    .selected
                    .as_ref()
                    .and_then(|node| find_by_id(forest, &node.id))
                    .cloned();
                self.expansion.prune(forest);
            }
            None => {
                self.selected = None;
                self.expansion.clear();
            }
        }
    }

    // ============================================================
    // Expansion
    // ============================================================

    /// Flip expansion of `id`; a no-op returning false when no tree holds it.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        match &self.forest {
            Some(forest) => self.expansion.toggle(forest, id),
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        if let Some(forest) = &self.forest {
            self.expansion.expand_all(forest);
        }
    }

    pub fn collapse_to_roots(&mut self) {
        if let Some(forest) = &self.forest {
            self.expansion.collapse_to_roots(forest);
        }
    }

    /// The single expand-all/collapse control.
    pub fn toggle_expand_all(&mut self) -> ExpansionState {
        match &self.forest {
            Some(forest) => self.expansion.toggle_all(forest),
            None => ExpansionState::NotAllExpanded,
        }
    }

    /// End of life: all state is dropped with the controller.
    pub fn dispose(self) {
        debug!(
            "dispose: controller at v{} with {} nodes",
            self.version,
            self.forest.as_ref().map_or(0, Forest::len)
        );
    }
}
