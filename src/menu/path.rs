//! Addressing nodes by the chain of ancestor ids leading to their sibling array.
//!
//! Every structural edit is phrased as: locate the node, build a new sibling
//! array, put it back at the same path. The empty path is the roots array.

use super::node::{LocalId, MenuNode};
use super::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Ancestor ids from the root down to the parent
    pub path: Vec<LocalId>,
    /// Position inside the sibling array at `path`
    pub index: usize,
}

impl Location {
    pub fn parent(&self) -> Option<LocalId> {
        self.path.last().copied()
    }
}

/// Depth-first search for `target`
pub fn locate(tree: &Tree, target: LocalId) -> Option<Location> {
    let mut path = Vec::new();
    locate_in(&tree.roots, target, &mut path)
}

fn locate_in(siblings: &[MenuNode], target: LocalId, path: &mut Vec<LocalId>) -> Option<Location> {
    for (index, node) in siblings.iter().enumerate() {
        if node.local_id == target {
            return Some(Location {
                path: path.clone(),
                index,
            });
        }
        path.push(node.local_id);
        if let Some(found) = locate_in(&node.children, target, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}

/// Sibling array at `path`; empty when any segment no longer exists
pub fn siblings_at<'a>(tree: &'a Tree, path: &[LocalId]) -> &'a [MenuNode] {
    let mut siblings: &[MenuNode] = &tree.roots;
    for segment in path {
        match siblings.iter().find(|n| n.local_id == *segment) {
            Some(node) => siblings = &node.children,
            None => return &[],
        }
    }
    siblings
}

/// Node with id `target`, wherever it sits
pub fn find_node(tree: &Tree, target: LocalId) -> Option<&MenuNode> {
    let location = locate(tree, target)?;
    siblings_at(tree, &location.path).get(location.index)
}

/// Tree with the sibling array at `path` swapped for `siblings`.
///
/// Branches off the path are moved over untouched. An unknown path leaves
/// the tree as it was.
pub fn with_siblings_replaced(mut tree: Tree, path: &[LocalId], siblings: Vec<MenuNode>) -> Tree {
    if let Some(slot) = siblings_at_mut(&mut tree.roots, path) {
        *slot = siblings;
    } else {
        tracing::warn!("Sibling path {:?} no longer exists, tree left unchanged", path);
    }
    tree
}

fn siblings_at_mut<'a>(roots: &'a mut Vec<MenuNode>, path: &[LocalId]) -> Option<&'a mut Vec<MenuNode>> {
    let mut siblings = roots;
    for segment in path {
        let node = siblings.iter_mut().find(|n| n.local_id == *segment)?;
        siblings = &mut node.children;
    }
    Some(siblings)
}
