//! Flattened content index with constant-time lookups

use ahash::AHashMap;

use super::{flatten, Category, CategorySummary, ContentItem, ContentPayload, ItemSlot};

/// One flatten cycle's view of the content.
///
/// Rebuilt whenever the source collection changes; global indices from an
/// older generation must not be used against a newer index.
#[derive(Debug, Clone)]
pub struct ContentIndex<P> {
    items: Vec<ContentItem<P>>,
    slots: Vec<ItemSlot>,
    categories: Vec<CategorySummary>,
    by_id: AHashMap<String, usize>,
    generation: u64,
}

impl<P> Default for ContentIndex<P> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            slots: Vec::new(),
            categories: Vec::new(),
            by_id: AHashMap::new(),
            generation: 0,
        }
    }
}

impl<P: ContentPayload + Clone> ContentIndex<P> {
    /// Flatten `categories` and build the lookup tables
    pub fn build(categories: &[Category<P>], generation: u64) -> Self {
        let items = flatten(categories);
        let slots: Vec<ItemSlot> = items.iter().map(ContentItem::slot).collect();

        let mut by_id = AHashMap::with_capacity(items.len());
        for item in &items {
            by_id.insert(item.id.clone(), item.global_index);
        }

        let mut summaries = Vec::with_capacity(categories.len());
        let mut start = 0;
        for (index, category) in categories.iter().enumerate() {
            let len = category.items.iter().filter(|p| p.is_some()).count();
            summaries.push(CategorySummary {
                index,
                id: category.id.clone(),
                title: category.title.clone(),
                start,
                len,
            });
            start += len;
        }

        tracing::debug!(
            items = items.len(),
            categories = summaries.len(),
            generation,
            "content index rebuilt"
        );

        Self {
            items,
            slots,
            categories: summaries,
            by_id,
            generation,
        }
    }
}

impl<P> ContentIndex<P> {
    pub fn items(&self) -> &[ContentItem<P>] {
        &self.items
    }

    pub fn slots(&self) -> &[ItemSlot] {
        &self.slots
    }

    pub fn categories(&self) -> &[CategorySummary] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, global_index: usize) -> Option<&ContentItem<P>> {
        self.items.get(global_index)
    }

    /// O(1) id lookup
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Global index for the active id, falling back to the first item
    pub fn resolve_active(&self, active_id: Option<&str>) -> usize {
        match active_id {
            Some(id) => self.position_of(id).unwrap_or_else(|| {
                tracing::warn!(id, "active item missing from index, falling back to first item");
                0
            }),
            None => 0,
        }
    }

    pub fn category(&self, category_index: usize) -> Option<&CategorySummary> {
        self.categories.get(category_index)
    }

    /// Item count of a category; `0` for unknown categories
    pub fn category_len(&self, category_index: usize) -> usize {
        self.category(category_index).map(|c| c.len).unwrap_or(0)
    }

    pub fn item_at(&self, category_index: usize, item_index: usize) -> Option<&ContentItem<P>> {
        let category = self.category(category_index)?;
        if item_index >= category.len {
            return None;
        }
        self.items.get(category.start + item_index)
    }

    /// Length of the longest category
    pub fn tallest_category_len(&self) -> usize {
        self.categories.iter().map(|c| c.len).max().unwrap_or(0)
    }

    /// Walk from `from` by `step` (wrapping) and return the first non-empty
    /// category other than `from` itself.
    pub fn next_non_empty_category(&self, from: usize, step: isize) -> Option<usize> {
        let count = self.categories.len();
        if count < 2 || step == 0 {
            return None;
        }

        let mut index = from % count;
        for _ in 1..count {
            index = wrap(index as isize + step, count);
            if index == from % count {
                break;
            }
            if !self.categories[index].is_empty() {
                return Some(index);
            }
        }
        None
    }
}

/// Euclidean wrap into `0..count`
pub fn wrap(value: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    value.rem_euclid(count as isize) as usize
}
