use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::node::{normalize_url, IdAllocator, MenuNode, PersistedId};

/// One row of the menu as the storage backend returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMenuItem {
    pub id: PersistedId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<PersistedId>,
    #[serde(default)]
    pub ord: i64,
}

/// The menu: root-level nodes in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub roots: Vec<MenuNode>,
}

impl Tree {
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.roots.iter().map(MenuNode::subtree_len).sum()
    }

    /// Build the nested tree out of the flat backend rows.
    ///
    /// Rows whose parent is missing (or is the row itself) become roots so no
    /// entry is ever dropped. Siblings are ordered by `ord`, ties keep the
    /// order the rows arrived in.
    pub fn from_remote(items: &[RemoteMenuItem], ids: &mut IdAllocator) -> Tree {
        let index: HashMap<PersistedId, usize> = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id, pos))
            .collect();

        // parent slot per row, None for roots
        let parents: Vec<Option<usize>> = items
            .iter()
            .map(|item| {
                item.parent_id
                    .and_then(|pid| index.get(&pid).copied())
                    .filter(|&slot| items[slot].id != item.id)
            })
            .collect();
        let parents = break_cycles(parents);

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
        let mut roots = Vec::new();
        for (pos, parent) in parents.iter().enumerate() {
            match parent {
                Some(slot) => children[*slot].push(pos),
                None => roots.push(pos),
            }
        }

        for group in children.iter_mut().chain(std::iter::once(&mut roots)) {
            group.sort_by_key(|&pos| items[pos].ord);
        }

        let roots = roots
            .iter()
            .enumerate()
            .map(|(order, &pos)| build_node(items, &children, pos, order, ids))
            .collect();

        let tree = Tree { roots };
        tracing::debug!("Loaded menu tree with {} items", tree.len());
        tree
    }

    /// Same titles, links, backend ids and sibling order at every level.
    /// Local ids and stored `order` values are ignored.
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        siblings_eq(&self.roots, &other.roots)
    }
}

fn siblings_eq(a: &[MenuNode], b: &[MenuNode]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.title == y.title
                && x.url == y.url
                && x.persisted_id == y.persisted_id
                && siblings_eq(&x.children, &y.children)
        })
}

fn build_node(
    items: &[RemoteMenuItem],
    children: &[Vec<usize>],
    pos: usize,
    order: usize,
    ids: &mut IdAllocator,
) -> MenuNode {
    let item = &items[pos];
    let mut node = MenuNode::new(ids.next(), item.title.clone(), normalize_url(item.url.clone()));
    node.persisted_id = Some(item.id);
    node.order = order;
    node.children = children[pos]
        .iter()
        .enumerate()
        .map(|(child_order, &child)| build_node(items, children, child, child_order, ids))
        .collect();
    node
}

/// Rows that only reach each other through parent links would never hang off
/// a root. Promote one row per cycle to a root instead of losing the group.
fn break_cycles(mut parents: Vec<Option<usize>>) -> Vec<Option<usize>> {
    // 0 = unvisited, 1 = on current walk, 2 = reaches a root
    let mut state = vec![0u8; parents.len()];
    for start in 0..parents.len() {
        let mut walk = Vec::new();
        let mut cur = start;
        loop {
            match state[cur] {
                2 => break,
                1 => {
                    parents[cur] = None;
                    break;
                }
                _ => {}
            }
            state[cur] = 1;
            walk.push(cur);
            match parents[cur] {
                Some(next) => cur = next,
                None => break,
            }
        }
        for pos in walk {
            state[pos] = 2;
        }
    }
    parents
}
