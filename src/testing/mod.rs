use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::MenuBackend;
use crate::error::{MenuError, MenuResult};
use crate::menu::{FlatMenuItem, PersistedId, RemoteMenuItem};
use crate::server::store::{MenuStore, StoreError};

/// In-process backend over the reference store, with call counters and
/// switches to make individual calls fail.
#[derive(Default)]
pub struct MemoryBackend {
    store: Mutex<MenuStore>,
    replace_calls: AtomicUsize,
    deleted: Mutex<Vec<PersistedId>>,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
}

impl MemoryBackend {
    pub fn with_items(items: Vec<RemoteMenuItem>) -> Self {
        Self {
            store: Mutex::new(MenuStore::with_items(items)),
            ..Self::default()
        }
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    /// Ids passed to `delete_item`, in call order
    pub fn deleted_ids(&self) -> Vec<PersistedId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MenuBackend for MemoryBackend {
    async fn fetch_items(&self) -> MenuResult<Vec<RemoteMenuItem>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(MenuError::server(503, "menu store unavailable"));
        }
        Ok(self.store.lock().unwrap().items().to_vec())
    }

    async fn replace_items(&self, items: &[FlatMenuItem]) -> MenuResult<()> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(MenuError::server(503, "menu store unavailable"));
        }
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        self.store
            .lock()
            .unwrap()
            .replace(items)
            .map_err(|e| MenuError::server(400, e.to_string()))
    }

    async fn delete_item(&self, id: PersistedId) -> MenuResult<()> {
        self.deleted.lock().unwrap().push(id);
        match self.store.lock().unwrap().remove(id) {
            Ok(()) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(MenuError::server(500, e.to_string())),
        }
    }
}
