use std::collections::HashMap;

use menu_admin::menu::ops::{add_node, drag_move, move_node, remove_node};
use menu_admin::menu::{
    flatten, Direction, FlatMenuItem, IdAllocator, ItemKey, LocalId, MenuNode, RemoteMenuItem, Tree,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

/// Rows whose parent is always an earlier row (or none), with arbitrary ords
fn menu_rows() -> impl Strategy<Value = Vec<RemoteMenuItem>> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>(), -3_i64..6, "[A-Za-z]{1,8}"), 0..24).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(pos, (parent, is_root, ord, title))| {
                    let id = pos as i64 + 1;
                    let parent_id = if pos == 0 || is_root {
                        None
                    } else {
                        Some(parent.index(pos) as i64 + 1)
                    };
                    RemoteMenuItem {
                        id,
                        title,
                        url: None,
                        parent_id,
                        ord,
                    }
                })
                .collect()
        },
    )
}

#[derive(Debug, Clone)]
enum Edit {
    Add { parent: Option<prop::sample::Index> },
    Remove(prop::sample::Index),
    Move(prop::sample::Index, bool),
    Drag(prop::sample::Index, prop::sample::Index),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<Option<prop::sample::Index>>().prop_map(|parent| Edit::Add { parent }),
        any::<prop::sample::Index>().prop_map(Edit::Remove),
        (any::<prop::sample::Index>(), any::<bool>()).prop_map(|(i, up)| Edit::Move(i, up)),
        (any::<prop::sample::Index>(), any::<prop::sample::Index>()).prop_map(|(a, b)| Edit::Drag(a, b)),
    ]
}

/// What the backend would hand back after storing `rows`
fn as_remote(rows: &[FlatMenuItem]) -> Vec<RemoteMenuItem> {
    let id_of = |key: &ItemKey| match key {
        ItemKey::Persisted(id) => *id,
        ItemKey::Local(local) => -(local.value() as i64),
    };
    rows.iter()
        .map(|row| RemoteMenuItem {
            id: id_of(&row.id),
            title: row.title.clone(),
            url: row.url.clone(),
            parent_id: row.parent_id.as_ref().map(id_of),
            ord: row.ord as i64,
        })
        .collect()
}

fn all_ids(tree: &Tree) -> Vec<LocalId> {
    fn walk(nodes: &[MenuNode], out: &mut Vec<LocalId>) {
        for node in nodes {
            out.push(node.local_id);
            walk(&node.children, out);
        }
    }
    let mut out = Vec::new();
    walk(&tree.roots, &mut out);
    out
}

fn orders_match_positions(nodes: &[MenuNode]) -> bool {
    nodes
        .iter()
        .enumerate()
        .all(|(pos, node)| node.order == pos && orders_match_positions(&node.children))
}

fn ords_dense(rows: &[FlatMenuItem]) -> bool {
    let mut groups: HashMap<Option<ItemKey>, Vec<usize>> = HashMap::new();
    for row in rows {
        groups.entry(row.parent_id).or_default().push(row.ord);
    }
    groups.into_values().all(|mut ords| {
        ords.sort();
        ords == (0..ords.len()).collect::<Vec<_>>()
    })
}

fn apply(tree: Tree, edit: &Edit, ids: &mut IdAllocator) -> Tree {
    let existing = all_ids(&tree);
    let pick = |index: &prop::sample::Index| (!existing.is_empty()).then(|| existing[index.index(existing.len())]);

    match edit {
        Edit::Add { parent } => {
            let parent = parent.as_ref().and_then(pick);
            let node = MenuNode::new(ids.next(), "New", None);
            add_node(tree, parent, node).0
        }
        Edit::Remove(target) => match pick(target) {
            Some(id) => remove_node(tree, id).0,
            None => tree,
        },
        Edit::Move(target, up) => match pick(target) {
            Some(id) => {
                let direction = if *up { Direction::Up } else { Direction::Down };
                move_node(tree, id, direction).0
            }
            None => tree,
        },
        Edit::Drag(active, over) => match (pick(active), pick(over)) {
            (Some(active), Some(over)) => drag_move(tree, active, over).0,
            _ => tree,
        },
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn flatten_then_load_rebuilds_the_same_tree(rows in menu_rows()) {
        let mut ids = IdAllocator::new();
        let tree = Tree::from_remote(&rows, &mut ids);
        prop_assert_eq!(tree.len(), rows.len());

        let flat = flatten(&tree);
        let reloaded = Tree::from_remote(&as_remote(&flat), &mut ids);
        prop_assert!(reloaded.structurally_eq(&tree));
        prop_assert_eq!(flatten(&reloaded), flat);
    }

    #[test]
    fn sibling_order_stays_dense_under_edits(
        rows in menu_rows(),
        edits in prop::collection::vec(edit(), 0..32),
    ) {
        let mut ids = IdAllocator::new();
        let mut tree = Tree::from_remote(&rows, &mut ids);

        for edit in &edits {
            tree = apply(tree, edit, &mut ids);
            prop_assert!(orders_match_positions(&tree.roots), "after {:?}", edit);
            prop_assert!(ords_dense(&flatten(&tree)), "after {:?}", edit);
        }

        // unsaved nodes survive the trip through storage as well
        let reloaded = Tree::from_remote(&as_remote(&flatten(&tree)), &mut ids);
        prop_assert_eq!(reloaded.len(), tree.len());
        prop_assert!(orders_match_positions(&reloaded.roots));
    }
}
