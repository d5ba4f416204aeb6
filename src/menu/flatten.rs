use serde::{Deserialize, Serialize};

use super::node::{ItemKey, MenuNode};
use super::tree::Tree;

/// Parent-pointer row sent to the backend on a full replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatMenuItem {
    pub id: ItemKey,
    pub title: String,
    pub url: Option<String>,
    pub ord: usize,
    pub parent_id: Option<ItemKey>,
}

/// Pre-order rows for the whole tree. `ord` always comes from the node's
/// current array position, never from its stored `order`.
pub fn flatten(tree: &Tree) -> Vec<FlatMenuItem> {
    let mut out = Vec::with_capacity(tree.len());
    flatten_into(&tree.roots, None, &mut out);
    out
}

fn flatten_into(siblings: &[MenuNode], parent: Option<ItemKey>, out: &mut Vec<FlatMenuItem>) {
    for (ord, node) in siblings.iter().enumerate() {
        let key = node.key();
        out.push(FlatMenuItem {
            id: key,
            title: node.title.clone(),
            url: node.url.clone(),
            ord,
            parent_id: parent,
        });
        flatten_into(&node.children, Some(key), out);
    }
}
