//! JSON content manifests
//!
//! A manifest is either an object with a `categories` array or a bare array
//! of categories:
//!
//! ```json
//! {
//!   "title": "Gallery",
//!   "categories": [
//!     { "id": "maps", "title": "Maps", "items": [{ "id": "m1" }, null] }
//!   ]
//! }
//! ```
//!
//! Payloads are kept as raw JSON. Their `id` field gives item identity and
//! `null` entries are orphans the engine skips.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sn_core::{Category, ContentPayload};
use tracing::{debug, warn};

use crate::{DataError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub title: Option<String>,
    pub categories: Vec<Category<Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestShape {
    Full(Manifest),
    Bare(Vec<Category<Value>>),
}

impl Manifest {
    pub fn new(categories: Vec<Category<Value>>) -> Self {
        Self {
            title: None,
            categories,
        }
    }

    /// Present payloads across all categories
    pub fn item_count(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.items.iter().flatten().count())
            .sum()
    }

    /// Payloads lacking a usable `id`; they get positional ids when
    /// flattened
    pub fn anonymous_items(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter().flatten())
            .filter(|payload| match payload.get("id") {
                Some(Value::String(id)) => id.is_empty(),
                Some(Value::Number(_)) => false,
                _ => true,
            })
            .count()
    }

    /// Explicit item ids used more than once, in first-repeat order. The
    /// engine gives the repeats positional ids.
    pub fn duplicate_item_ids(&self) -> Vec<String> {
        let mut seen = AHashSet::new();
        let mut duplicates = Vec::new();
        for payload in self.categories.iter().flat_map(|c| c.items.iter().flatten()) {
            let Some(id) = payload.content_id() else {
                continue;
            };
            if !seen.insert(id.clone()) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    pub fn into_categories(self) -> Vec<Category<Value>> {
        self.categories
    }
}

/// Parse and sanity-check a manifest. Empty categories are allowed, an
/// empty category list is not.
pub fn parse_manifest(json: &str) -> Result<Manifest> {
    let manifest = match serde_json::from_str::<ManifestShape>(json) {
        Ok(ManifestShape::Full(manifest)) => manifest,
        Ok(ManifestShape::Bare(categories)) => Manifest::new(categories),
        // Re-parse as the full shape for a precise error location
        Err(_) => serde_json::from_str::<Manifest>(json)?,
    };

    if manifest.categories.is_empty() {
        return Err(DataError::EmptyManifest);
    }

    let mut seen = AHashSet::new();
    for category in &manifest.categories {
        if !seen.insert(category.id.as_str()) {
            warn!(id = %category.id, "Duplicate category id in manifest");
        }
    }
    for id in manifest.duplicate_item_ids() {
        warn!(%id, "Duplicate item id in manifest");
    }

    debug!(
        categories = manifest.categories.len(),
        items = manifest.item_count(),
        anonymous = manifest.anonymous_items(),
        "Parsed manifest"
    );
    Ok(manifest)
}
