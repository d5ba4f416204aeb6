use super::tree::Tree;

/// Pending up/down reordering that has not been saved yet.
///
/// The first move on a clean tree captures the tree as it was; later moves
/// leave that capture alone. Only one capture exists at a time.
#[derive(Debug, Default)]
pub struct ReorderSession {
    snapshot: Option<Tree>,
}

impl ReorderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Capture `tree` unless a reorder is already pending
    pub fn begin(&mut self, tree: &Tree) {
        if self.snapshot.is_none() {
            tracing::debug!("Reorder started, snapshot of {} items taken", tree.len());
            self.snapshot = Some(tree.clone());
        }
    }

    /// Keep the live tree; the snapshot is discarded
    pub fn commit(&mut self) {
        self.snapshot = None;
    }

    /// Hand back the captured tree and return to clean
    pub fn rollback(&mut self) -> Option<Tree> {
        self.snapshot.take()
    }
}
