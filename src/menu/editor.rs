//! Editing session over one menu.
//!
//! Edits are applied to the local tree first and then written through to the
//! backend as a full replace followed by a reload. A failed write leaves the
//! local edit in place; the next successful load reconciles it. Up/down moves
//! are the exception: they pile up locally until `confirm` or `cancel`.

use futures::future::join_all;

use super::flatten::flatten;
use super::node::{normalize_url, IdAllocator, LocalId, MenuNode};
use super::ops::{self, Direction, EditOutcome};
use super::path::find_node;
use super::snapshot::ReorderSession;
use super::tree::Tree;
use crate::client::MenuBackend;
use crate::error::{MenuError, MenuResult};

pub struct MenuEditor<B: MenuBackend> {
    backend: B,
    ids: IdAllocator,
    tree: Tree,
    reorder: ReorderSession,
}

impl<B: MenuBackend> MenuEditor<B> {
    /// Editor with an empty tree; call [`MenuEditor::load`] to fill it
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: IdAllocator::new(),
            tree: Tree::default(),
            reorder: ReorderSession::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True while up/down moves are waiting for confirm or cancel
    pub fn is_dirty(&self) -> bool {
        self.reorder.is_dirty()
    }

    /// Replace the local tree with the backend's. On failure the tree is
    /// left exactly as it was.
    pub async fn load(&mut self) -> MenuResult<()> {
        let items = self.backend.fetch_items().await.map_err(|e| {
            tracing::error!("Failed to load menu: {}", e);
            e
        })?;
        self.tree = Tree::from_remote(&items, &mut self.ids);
        if self.reorder.is_dirty() {
            tracing::info!("Reload discarded a pending reorder");
            self.reorder.commit();
        }
        tracing::info!("Menu loaded: {} items", self.tree.len());
        Ok(())
    }

    /// Append a new entry under `parent` (or at the root) and save.
    /// Returns the new node's id, or `None` when the parent no longer exists.
    pub async fn add(&mut self, parent: Option<LocalId>, title: &str, url: Option<String>) -> MenuResult<Option<LocalId>> {
        self.ensure_clean()?;
        let title = validate_title(title)?;

        let node = MenuNode::new(self.ids.next(), title, normalize_url(url));
        let id = node.local_id;
        let (tree, outcome) = ops::add_node(self.take_tree(), parent, node);
        self.tree = tree;
        if !outcome.applied() {
            return Ok(None);
        }

        tracing::info!("Added menu item '{}' ({})", title, id);
        self.persist().await?;
        Ok(Some(id))
    }

    /// Change an entry's title and link and save
    pub async fn rename(&mut self, id: LocalId, title: &str, url: Option<String>) -> MenuResult<EditOutcome> {
        self.ensure_clean()?;
        let title = validate_title(title)?;

        let (tree, outcome) = ops::update_node(self.take_tree(), id, title, url);
        self.tree = tree;
        if outcome.applied() {
            tracing::info!("Renamed menu item {} to '{}'", id, title);
            self.persist().await?;
        }
        Ok(outcome)
    }

    /// Remove an entry and everything below it.
    ///
    /// Every saved node in the subtree gets its own delete request; the
    /// requests run concurrently and the tree is reloaded once all finish.
    /// A subtree that was never saved is dropped locally without any
    /// network call.
    pub async fn delete(&mut self, id: LocalId) -> MenuResult<EditOutcome> {
        self.ensure_clean()?;

        if find_node(&self.tree, id).is_none() {
            tracing::warn!("Node {} not found, delete ignored", id);
            return Ok(EditOutcome::NoOp);
        }

        let persisted = ops::persisted_ids_in_subtree(&self.tree, id);
        if persisted.is_empty() {
            let (tree, outcome) = ops::remove_node(self.take_tree(), id);
            self.tree = tree;
            tracing::info!("Dropped unsaved menu item {}", id);
            return Ok(outcome);
        }

        tracing::info!("Deleting menu item {} with {} saved item(s)", id, persisted.len());
        let results = join_all(persisted.iter().map(|&pid| self.backend.delete_item(pid))).await;
        let first_failure = persisted
            .iter()
            .zip(results)
            .filter_map(|(pid, result)| result.err().map(|e| (*pid, e)))
            .inspect(|(pid, e)| tracing::error!("Failed to delete menu item {}: {}", pid, e))
            .map(|(_, e)| e)
            .reduce(|first, _| first);

        let reloaded = self.load().await;
        match (first_failure, reloaded) {
            (Some(e), _) => Err(e),
            (None, Err(e)) => Err(e),
            (None, Ok(())) => Ok(EditOutcome::Applied),
        }
    }

    /// Swap an entry with its neighbour. Not saved until [`MenuEditor::confirm`].
    pub fn move_node(&mut self, id: LocalId, direction: Direction) -> EditOutcome {
        let (moved, outcome) = ops::move_node(self.tree.clone(), id, direction);
        if outcome.applied() {
            self.reorder.begin(&self.tree);
            self.tree = moved;
            tracing::debug!("Moved menu item {} {:?}", id, direction);
        }
        outcome
    }

    /// Drop `active` onto `over` within one sibling array and save straight away
    pub async fn drag_move(&mut self, active: LocalId, over: LocalId) -> MenuResult<EditOutcome> {
        self.ensure_clean()?;

        let (tree, outcome) = ops::drag_move(self.take_tree(), active, over);
        self.tree = tree;
        if outcome.applied() {
            tracing::info!("Dragged menu item {} onto {}", active, over);
            self.persist().await?;
        }
        Ok(outcome)
    }

    /// Save the pending reorder. If the save is rejected the reorder stays
    /// pending; once the backend has accepted it the snapshot is dropped,
    /// even when the reload that follows fails.
    pub async fn confirm(&mut self) -> MenuResult<()> {
        if !self.reorder.is_dirty() {
            return Ok(());
        }
        self.save().await?;
        self.reorder.commit();
        self.reload().await
    }

    /// Throw away the pending reorder and restore the tree from before it
    pub fn cancel(&mut self) {
        if let Some(snapshot) = self.reorder.rollback() {
            tracing::info!("Reorder cancelled");
            self.tree = snapshot;
        }
    }

    /// Full replace with the flattened tree, then reload so unsaved nodes
    /// pick up their backend ids.
    async fn persist(&mut self) -> MenuResult<()> {
        self.save().await?;
        self.reload().await
    }

    async fn save(&mut self) -> MenuResult<()> {
        let items = flatten(&self.tree);
        if let Err(e) = self.backend.replace_items(&items).await {
            tracing::error!("Failed to save menu: {}", e);
            return Err(e);
        }
        tracing::info!("Menu saved: {} items", items.len());
        Ok(())
    }

    async fn reload(&mut self) -> MenuResult<()> {
        let items = self.backend.fetch_items().await.map_err(|e| {
            tracing::error!("Failed to reload menu after save: {}", e);
            e
        })?;
        self.tree = Tree::from_remote(&items, &mut self.ids);
        Ok(())
    }

    fn ensure_clean(&self) -> MenuResult<()> {
        if self.reorder.is_dirty() {
            return Err(MenuError::ReorderPending);
        }
        Ok(())
    }

    fn take_tree(&mut self) -> Tree {
        std::mem::take(&mut self.tree)
    }
}

fn validate_title(title: &str) -> MenuResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MenuError::validation("Title is required"));
    }
    Ok(title)
}
