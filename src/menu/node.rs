use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Backend identifier of a saved menu item
pub type PersistedId = i64;

const LOCAL_PREFIX: &str = "tmp-";

/// Session-local node identifier, assigned once and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u64);

impl LocalId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LocalId {
    type Err = String;

    /// Accepts `7`, `#7` and the wire form `tmp-7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches('#')
            .trim_start_matches(LOCAL_PREFIX);
        digits
            .parse::<u64>()
            .map(LocalId)
            .map_err(|_| format!("invalid node id '{}'", s))
    }
}

/// Hands out local ids for the lifetime of an editor session.
///
/// Ids only need to be unique within the session: a reload replaces every
/// node, so the counter is never reset or persisted.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> LocalId {
        self.next += 1;
        LocalId(self.next)
    }
}

/// Key a node is known by on the wire: its backend id once saved, otherwise
/// its local id. Persisted keys travel as JSON numbers, local keys as
/// `"tmp-<n>"` strings so the two can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Persisted(PersistedId),
    Local(LocalId),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Persisted(id) => write!(f, "{}", id),
            ItemKey::Local(id) => write!(f, "{}{}", LOCAL_PREFIX, id.0),
        }
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemKey::Persisted(id) => serializer.serialize_i64(*id),
            ItemKey::Local(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(ItemKey::Persisted(id)),
            Raw::Text(text) => {
                if let Some(rest) = text.strip_prefix(LOCAL_PREFIX) {
                    rest.parse::<u64>()
                        .map(|n| ItemKey::Local(LocalId(n)))
                        .map_err(|_| de::Error::custom(format!("invalid local key '{}'", text)))
                } else {
                    text.parse::<i64>()
                        .map(ItemKey::Persisted)
                        .map_err(|_| de::Error::custom(format!("invalid item key '{}'", text)))
                }
            }
        }
    }
}

/// A single navigation entry and its children
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub local_id: LocalId,
    pub persisted_id: Option<PersistedId>,
    pub title: String,
    pub url: Option<String>,
    /// Position among siblings; rewritten on every structural change
    pub order: usize,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// New unsaved leaf
    pub fn new(local_id: LocalId, title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            local_id,
            persisted_id: None,
            title: title.into(),
            url: normalize_url(url),
            order: 0,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> ItemKey {
        match self.persisted_id {
            Some(id) => ItemKey::Persisted(id),
            None => ItemKey::Local(self.local_id),
        }
    }

    /// Number of nodes in this subtree, the node itself included
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(MenuNode::subtree_len).sum::<usize>()
    }
}

/// Empty or blank links mean "no link"
pub fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}
