//! Content model: categories of opaque payloads flattened into one
//! addressable sequence.

mod index;

pub use index::{wrap, ContentIndex};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Anything that can be positioned. The engine only ever asks a payload for
/// its identity.
pub trait ContentPayload {
    /// Stable identity carried by the payload itself, if any
    fn content_id(&self) -> Option<String>;
}

impl ContentPayload for serde_json::Value {
    fn content_id(&self) -> Option<String> {
        match self.get("id")? {
            serde_json::Value::String(id) if !id.is_empty() => Some(id.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl ContentPayload for String {
    fn content_id(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.clone())
    }
}

impl ContentPayload for &str {
    fn content_id(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

/// An ordered group of content. `None` entries are orphaned payloads and are
/// skipped when flattening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category<P> {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<P>>,
}

impl<P> Category<P> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            items: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append present payloads
    pub fn with_items(mut self, items: impl IntoIterator<Item = P>) -> Self {
        self.items.extend(items.into_iter().map(Some));
        self
    }
}

/// Position of an item in every coordinate system the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ItemSlot {
    pub category_index: usize,
    pub item_index: usize,
    pub global_index: usize,
}

/// A flattened content item
#[derive(Debug, Clone)]
pub struct ContentItem<P> {
    pub id: String,
    pub category_id: String,
    pub category_index: usize,
    pub item_index: usize,
    pub global_index: usize,
    pub payload: P,
}

impl<P> ContentItem<P> {
    pub fn slot(&self) -> ItemSlot {
        ItemSlot {
            category_index: self.category_index,
            item_index: self.item_index,
            global_index: self.global_index,
        }
    }
}

/// Per-category view produced by one flatten cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub index: usize,
    pub id: String,
    pub title: Option<String>,
    /// Global index of the first item (equal to the next category's start when empty)
    pub start: usize,
    pub len: usize,
}

impl CategorySummary {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Title for overlays, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn global_range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Flatten categories into the global item sequence.
///
/// Runs in O(n). Orphaned (`None`) payloads are dropped and do not consume an
/// item index; identity falls back to `"{category_id}-{item_index}"`. Ids
/// are unique across the sequence: a repeated id is replaced by the
/// positional one.
pub fn flatten<P: ContentPayload + Clone>(categories: &[Category<P>]) -> Vec<ContentItem<P>> {
    let capacity = categories.iter().map(|c| c.items.len()).sum();
    let mut items = Vec::with_capacity(capacity);
    let mut seen = AHashSet::with_capacity(capacity);

    for (category_index, category) in categories.iter().enumerate() {
        let mut item_index = 0;
        for payload in category.items.iter().flatten() {
            let positional = format!("{}-{}", category.id, item_index);
            let mut id = payload.content_id().unwrap_or_else(|| positional.clone());
            if seen.contains(&id) {
                let unique = unused_id(&seen, positional);
                tracing::warn!(
                    duplicate = %id,
                    id = %unique,
                    category = %category.id,
                    "duplicate item id, using positional id"
                );
                id = unique;
            }
            seen.insert(id.clone());

            items.push(ContentItem {
                id,
                category_id: category.id.clone(),
                category_index,
                item_index,
                global_index: items.len(),
                payload: payload.clone(),
            });
            item_index += 1;
        }
    }

    items
}

/// `base`, or `base~2`, `base~3`... whichever is free first
fn unused_id(seen: &AHashSet<String>, base: String) -> String {
    if !seen.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}~{}", base, n);
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Linear scan for an item id
pub fn find_index<P>(items: &[ContentItem<P>], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id == id)
}

/// Global index of the active id, or `0` when it disappeared
pub fn resolve_active<P>(items: &[ContentItem<P>], active_id: &str) -> usize {
    find_index(items, active_id).unwrap_or_else(|| {
        tracing::warn!(active_id, "active item missing after refresh, falling back to first item");
        0
    })
}
