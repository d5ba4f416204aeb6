//! Storage collaborator the editor persists through.

pub mod http;

use async_trait::async_trait;

use crate::error::MenuResult;
use crate::menu::{FlatMenuItem, PersistedId, RemoteMenuItem};

pub use http::HttpMenuBackend;

/// The three calls the editor needs from menu storage
#[async_trait]
pub trait MenuBackend: Send + Sync {
    /// Every item of the menu, unordered
    async fn fetch_items(&self) -> MenuResult<Vec<RemoteMenuItem>>;

    /// Replace the whole menu with `items`
    async fn replace_items(&self, items: &[FlatMenuItem]) -> MenuResult<()>;

    /// Remove one item. Removing an id that is already gone succeeds.
    async fn delete_item(&self, id: PersistedId) -> MenuResult<()>;
}

#[async_trait]
impl<B: MenuBackend + ?Sized> MenuBackend for std::sync::Arc<B> {
    async fn fetch_items(&self) -> MenuResult<Vec<RemoteMenuItem>> {
        (**self).fetch_items().await
    }

    async fn replace_items(&self, items: &[FlatMenuItem]) -> MenuResult<()> {
        (**self).replace_items(items).await
    }

    async fn delete_item(&self, id: PersistedId) -> MenuResult<()> {
        (**self).delete_item(id).await
    }
}
