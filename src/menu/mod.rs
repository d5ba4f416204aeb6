//! Hierarchical navigation menu: nested in-memory tree over a flat,
//! parent-addressed backend model.

pub mod editor;
pub mod flatten;
pub mod node;
pub mod ops;
pub mod path;
pub mod snapshot;
pub mod tree;

pub use editor::MenuEditor;
pub use flatten::{flatten, FlatMenuItem};
pub use node::{IdAllocator, ItemKey, LocalId, MenuNode, PersistedId};
pub use ops::{Direction, EditOutcome};
pub use path::{locate, siblings_at, with_siblings_replaced, Location};
pub use snapshot::ReorderSession;
pub use tree::{RemoteMenuItem, Tree};
