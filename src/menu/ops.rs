//! Pure tree transforms behind every edit the administrator can make.
//!
//! Each function takes the tree by value and hands back the edited tree.
//! A stale id (the node vanished after a reload) is a no-op, never an error.

use super::node::{normalize_url, LocalId, MenuNode, PersistedId};
use super::path::{find_node, locate, siblings_at, with_siblings_replaced};
use super::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    NoOp,
}

impl EditOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Rewrite `order` so it matches array position
pub fn renumber(siblings: &mut [MenuNode]) {
    for (order, node) in siblings.iter_mut().enumerate() {
        node.order = order;
    }
}

/// Append `node` as the last child of `parent` (or as the last root).
/// An unknown parent leaves the tree unchanged.
pub fn add_node(tree: Tree, parent: Option<LocalId>, mut node: MenuNode) -> (Tree, EditOutcome) {
    let path = match parent {
        None => Vec::new(),
        Some(parent_id) => match locate(&tree, parent_id) {
            Some(mut location) => {
                location.path.push(parent_id);
                location.path
            }
            None => {
                tracing::warn!("Parent {} not found, add ignored", parent_id);
                return (tree, EditOutcome::NoOp);
            }
        },
    };

    let mut siblings = siblings_at(&tree, &path).to_vec();
    node.order = siblings.len();
    siblings.push(node);
    (with_siblings_replaced(tree, &path, siblings), EditOutcome::Applied)
}

/// Change title and link in place, keeping position and children
pub fn update_node(tree: Tree, id: LocalId, title: &str, url: Option<String>) -> (Tree, EditOutcome) {
    let Some(location) = locate(&tree, id) else {
        tracing::warn!("Node {} not found, update ignored", id);
        return (tree, EditOutcome::NoOp);
    };

    let mut siblings = siblings_at(&tree, &location.path).to_vec();
    let node = &mut siblings[location.index];
    node.title = title.to_string();
    node.url = normalize_url(url);
    (with_siblings_replaced(tree, &location.path, siblings), EditOutcome::Applied)
}

/// Drop the node and its whole subtree from the local tree
pub fn remove_node(tree: Tree, id: LocalId) -> (Tree, EditOutcome) {
    let Some(location) = locate(&tree, id) else {
        tracing::warn!("Node {} not found, remove ignored", id);
        return (tree, EditOutcome::NoOp);
    };

    let mut siblings = siblings_at(&tree, &location.path).to_vec();
    siblings.remove(location.index);
    renumber(&mut siblings);
    (with_siblings_replaced(tree, &location.path, siblings), EditOutcome::Applied)
}

/// Backend ids of the node and every saved descendant, pre-order.
/// Unsaved nodes contribute nothing.
pub fn persisted_ids_in_subtree(tree: &Tree, id: LocalId) -> Vec<PersistedId> {
    fn collect(node: &MenuNode, out: &mut Vec<PersistedId>) {
        out.extend(node.persisted_id);
        for child in &node.children {
            collect(child, out);
        }
    }

    let mut ids = Vec::new();
    if let Some(node) = find_node(tree, id) {
        collect(node, &mut ids);
    }
    ids
}

/// Swap the node with its previous or next sibling. Never leaves the
/// sibling array; the first node cannot go up and the last cannot go down.
pub fn move_node(tree: Tree, id: LocalId, direction: Direction) -> (Tree, EditOutcome) {
    let Some(location) = locate(&tree, id) else {
        tracing::warn!("Node {} not found, move ignored", id);
        return (tree, EditOutcome::NoOp);
    };

    let mut siblings = siblings_at(&tree, &location.path).to_vec();
    let neighbor = match direction {
        Direction::Up => location.index.checked_sub(1),
        Direction::Down => Some(location.index + 1).filter(|&i| i < siblings.len()),
    };
    let Some(neighbor) = neighbor else {
        tracing::debug!("Node {} already at the {:?} boundary", id, direction);
        return (tree, EditOutcome::NoOp);
    };

    siblings.swap(location.index, neighbor);
    renumber(&mut siblings);
    (with_siblings_replaced(tree, &location.path, siblings), EditOutcome::Applied)
}

/// Reorder `active` into the slot currently held by `over` (remove, then
/// insert). Both must share a parent; dragging across parents is ignored.
pub fn drag_move(tree: Tree, active: LocalId, over: LocalId) -> (Tree, EditOutcome) {
    if active == over {
        return (tree, EditOutcome::NoOp);
    }
    let (Some(from), Some(to)) = (locate(&tree, active), locate(&tree, over)) else {
        tracing::warn!("Drag {} -> {} references a missing node, ignored", active, over);
        return (tree, EditOutcome::NoOp);
    };
    if from.path != to.path {
        tracing::debug!("Drag {} -> {} crosses parents, ignored", active, over);
        return (tree, EditOutcome::NoOp);
    }

    let mut siblings = siblings_at(&tree, &from.path).to_vec();
    let node = siblings.remove(from.index);
    siblings.insert(to.index, node);
    renumber(&mut siblings);
    (with_siblings_replaced(tree, &from.path, siblings), EditOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::flatten::flatten;
    use crate::menu::node::IdAllocator;
    use crate::menu::tree::RemoteMenuItem;
    use std::collections::HashMap;

    fn sample(ids: &mut IdAllocator) -> Tree {
        let rows = [
            (1, "Home", None, 0),
            (2, "About", None, 1),
            (3, "Contact", None, 2),
            (4, "Team", Some(2), 0),
            (5, "History", Some(2), 1),
            (6, "Jobs", Some(2), 2),
        ];
        let items: Vec<RemoteMenuItem> = rows
            .iter()
            .map(|&(id, title, parent_id, ord)| RemoteMenuItem {
                id,
                title: title.to_string(),
                url: None,
                parent_id,
                ord,
            })
            .collect();
        Tree::from_remote(&items, ids)
    }

    fn titles(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    fn assert_dense(tree: &Tree) {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for item in flatten(tree) {
            let parent = item.parent_id.map(|p| p.to_string()).unwrap_or_default();
            groups.entry(parent).or_default().push(item.ord);
        }
        for (_, mut ords) in groups {
            ords.sort();
            assert_eq!(ords, (0..ords.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn add_appends_to_parent() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let about = tree.roots[1].local_id;
        let node = MenuNode::new(ids.next(), "Press", None);
        let new_id = node.local_id;

        let (tree, outcome) = add_node(tree, Some(about), node);
        assert!(outcome.applied());
        let children = &tree.roots[1].children;
        assert_eq!(titles(children), vec!["Team", "History", "Jobs", "Press"]);
        assert_eq!(children[3].local_id, new_id);
        assert_eq!(children[3].order, 3);
        assert_eq!(children[3].persisted_id, None);
    }

    #[test]
    fn add_without_parent_appends_root() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let (tree, _) = add_node(tree, None, MenuNode::new(ids.next(), "Blog", None));
        assert_eq!(titles(&tree.roots), vec!["Home", "About", "Contact", "Blog"]);
    }

    #[test]
    fn add_under_missing_parent_is_noop() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let before = tree.clone();
        let ghost = ids.next();
        let (tree, outcome) = add_node(tree, Some(ghost), MenuNode::new(ids.next(), "X", None));
        assert_eq!(outcome, EditOutcome::NoOp);
        assert_eq!(tree, before);
    }

    #[test]
    fn stale_ids_leave_tree_unchanged() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let before = tree.clone();
        let ghost = ids.next();
        let home = tree.roots[0].local_id;

        let (tree, up) = move_node(tree, ghost, Direction::Up);
        let (tree, down) = move_node(tree, ghost, Direction::Down);
        let (tree, drag_from) = drag_move(tree, ghost, home);
        let (tree, drag_onto) = drag_move(tree, home, ghost);
        let (tree, update) = update_node(tree, ghost, "X", None);
        let (tree, remove) = remove_node(tree, ghost);
        for outcome in [up, down, drag_from, drag_onto, update, remove] {
            assert_eq!(outcome, EditOutcome::NoOp);
        }
        assert_eq!(tree, before);
        assert!(persisted_ids_in_subtree(&tree, ghost).is_empty());
    }

    #[test]
    fn update_keeps_position_and_children() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let about = tree.roots[1].local_id;
        let (tree, outcome) = update_node(tree, about, "About us", Some("/about".into()));
        assert!(outcome.applied());
        assert_eq!(tree.roots[1].title, "About us");
        assert_eq!(tree.roots[1].url.as_deref(), Some("/about"));
        assert_eq!(tree.roots[1].children.len(), 3);
        assert_eq!(tree.roots[1].local_id, about);
    }

    #[test]
    fn remove_renumbers_remaining_siblings() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let home = tree.roots[0].local_id;
        let (tree, outcome) = remove_node(tree, home);
        assert!(outcome.applied());
        assert_eq!(titles(&tree.roots), vec!["About", "Contact"]);
        assert_eq!(tree.roots[0].order, 0);
        assert_eq!(tree.roots[1].order, 1);
        assert_dense(&tree);
    }

    #[test]
    fn subtree_ids_cover_all_saved_descendants() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let about = tree.roots[1].local_id;
        let team = tree.roots[1].children[0].local_id;
        let (tree, _) = add_node(tree, Some(team), MenuNode::new(ids.next(), "Draft", None));

        let collected = persisted_ids_in_subtree(&tree, about);
        assert_eq!(collected, vec![2, 4, 5, 6]);

        let draft = tree.roots[1].children[0].children[0].local_id;
        assert!(persisted_ids_in_subtree(&tree, draft).is_empty());
    }

    #[test]
    fn move_swaps_within_siblings() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let history = tree.roots[1].children[1].local_id;

        let (tree, outcome) = move_node(tree, history, Direction::Up);
        assert!(outcome.applied());
        assert_eq!(titles(&tree.roots[1].children), vec!["History", "Team", "Jobs"]);

        let (tree, _) = move_node(tree, history, Direction::Down);
        let (tree, _) = move_node(tree, history, Direction::Down);
        assert_eq!(titles(&tree.roots[1].children), vec!["Team", "Jobs", "History"]);
        assert_eq!(titles(&tree.roots), vec!["Home", "About", "Contact"]);
        assert_dense(&tree);
    }

    #[test]
    fn move_at_boundaries_is_noop() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let before = tree.clone();
        let first = tree.roots[0].local_id;
        let last = tree.roots[2].local_id;

        let (tree, up) = move_node(tree, first, Direction::Up);
        let (tree, down) = move_node(tree, last, Direction::Down);
        assert_eq!(up, EditOutcome::NoOp);
        assert_eq!(down, EditOutcome::NoOp);
        assert_eq!(tree, before);
    }

    #[test]
    fn drag_reinserts_at_target_index() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let team = tree.roots[1].children[0].local_id;
        let jobs = tree.roots[1].children[2].local_id;

        let (tree, outcome) = drag_move(tree, team, jobs);
        assert!(outcome.applied());
        assert_eq!(titles(&tree.roots[1].children), vec!["History", "Jobs", "Team"]);

        let history = tree_child(&tree, 0);
        let (tree, _) = drag_move(tree, team, history);
        assert_eq!(titles(&tree.roots[1].children), vec!["Team", "History", "Jobs"]);
        assert_dense(&tree);
    }

    fn tree_child(tree: &Tree, index: usize) -> LocalId {
        tree.roots[1].children[index].local_id
    }

    #[test]
    fn drag_across_parents_is_noop() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let before = tree.clone();
        let home = tree.roots[0].local_id;
        let team = tree.roots[1].children[0].local_id;

        let (tree, outcome) = drag_move(tree, team, home);
        assert_eq!(outcome, EditOutcome::NoOp);
        assert_eq!(tree, before);
    }

    #[test]
    fn density_holds_after_mixed_edits() {
        let mut ids = IdAllocator::new();
        let tree = sample(&mut ids);
        let about = tree.roots[1].local_id;
        let home = tree.roots[0].local_id;
        let (tree, _) = add_node(tree, Some(about), MenuNode::new(ids.next(), "Press", None));
        let (tree, _) = add_node(tree, None, MenuNode::new(ids.next(), "Blog", None));
        let team = tree.roots[1].children[0].local_id;
        let (tree, _) = remove_node(tree, team);
        let (tree, _) = move_node(tree, home, Direction::Down);
        let blog = tree.roots[3].local_id;
        let (tree, _) = drag_move(tree, blog, home);
        assert_dense(&tree);
    }
}
