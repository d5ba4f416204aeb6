use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::menu::{FlatMenuItem, ItemKey, PersistedId, RemoteMenuItem};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Item {0} has an empty title")]
    EmptyTitle(ItemKey),

    #[error("Item {0} appears more than once")]
    DuplicateKey(ItemKey),

    #[error("Item {key} references parent {parent} which is not in the menu")]
    UnknownParent { key: ItemKey, parent: ItemKey },

    #[error("Item {0} is its own parent")]
    SelfParent(ItemKey),

    #[error("Menu item {0} not found")]
    NotFound(PersistedId),
}

/// Rows of one menu, as the storage side keeps them
#[derive(Debug, Clone, Default)]
pub struct MenuStore {
    next_id: PersistedId,
    items: Vec<RemoteMenuItem>,
}

impl MenuStore {
    pub fn with_items(items: Vec<RemoteMenuItem>) -> Self {
        let next_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        Self { next_id, items }
    }

    pub fn items(&self) -> &[RemoteMenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace every row with `payload`.
    ///
    /// Numeric keys keep their id, `tmp-*` keys receive fresh ids, and parent
    /// references are resolved through the same mapping. The store is left
    /// untouched when the payload is rejected.
    pub fn replace(&mut self, payload: &[FlatMenuItem]) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(payload.len());
        for item in payload {
            if item.title.trim().is_empty() {
                return Err(StoreError::EmptyTitle(item.id));
            }
            if !seen.insert(item.id) {
                return Err(StoreError::DuplicateKey(item.id));
            }
        }

        // fresh ids must not collide with ids the payload keeps
        let mut next_id = payload
            .iter()
            .filter_map(|item| match item.id {
                ItemKey::Persisted(id) => Some(id),
                ItemKey::Local(_) => None,
            })
            .fold(self.next_id, PersistedId::max);

        let mut assigned: HashMap<ItemKey, PersistedId> = HashMap::with_capacity(payload.len());
        for item in payload {
            let id = match item.id {
                ItemKey::Persisted(id) => id,
                ItemKey::Local(_) => {
                    next_id += 1;
                    next_id
                }
            };
            assigned.insert(item.id, id);
        }

        let mut rows = Vec::with_capacity(payload.len());
        for item in payload {
            let parent_id = match item.parent_id {
                None => None,
                Some(parent) if parent == item.id => return Err(StoreError::SelfParent(item.id)),
                Some(parent) => match assigned.get(&parent) {
                    Some(id) => Some(*id),
                    None => {
                        return Err(StoreError::UnknownParent {
                            key: item.id,
                            parent,
                        })
                    }
                },
            };
            rows.push(RemoteMenuItem {
                id: assigned[&item.id],
                title: item.title.trim().to_string(),
                url: item.url.clone().filter(|u| !u.trim().is_empty()),
                parent_id,
                ord: item.ord as i64,
            });
        }

        self.next_id = next_id;
        self.items = rows;
        Ok(())
    }

    /// Delete a single row. Children are left for the caller to remove.
    pub fn remove(&mut self, id: PersistedId) -> Result<(), StoreError> {
        let pos = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.items.remove(pos);
        Ok(())
    }
}
