use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::positioner::Positioner;
use crate::LayoutError;

/// A registered layout
#[derive(Clone)]
pub struct LayoutEntry {
    pub positioner: Arc<dyn Positioner>,
    /// Switching into this layout enters browse mode automatically
    pub auto_browse: bool,
}

impl std::fmt::Debug for LayoutEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEntry")
            .field("positioner", &self.positioner.name())
            .field("auto_browse", &self.auto_browse)
            .finish()
    }
}

/// Named layouts in registration order
#[derive(Default, Clone, Debug)]
pub struct PositionerRegistry {
    entries: IndexMap<String, LayoutEntry>,
}

impl PositionerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the positioner's own name, replacing any previous entry
    pub fn register(&mut self, positioner: Arc<dyn Positioner>, auto_browse: bool) {
        let name = positioner.name().to_string();
        debug!(layout = %name, auto_browse, "Registering layout");
        self.entries.insert(
            name,
            LayoutEntry {
                positioner,
                auto_browse,
            },
        );
    }

    pub fn get(&self, name: &str) -> Result<&LayoutEntry, LayoutError> {
        self.entries
            .get(name)
            .ok_or_else(|| LayoutError::UnknownLayout(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First registered layout
    pub fn first(&self) -> Result<&str, LayoutError> {
        self.entries
            .get_index(0)
            .map(|(name, _)| name.as_str())
            .ok_or(LayoutError::Empty)
    }

    /// Name registered after `current`, wrapping around. Unknown names
    /// resolve to the first layout.
    pub fn next_after(&self, current: &str) -> Result<&str, LayoutError> {
        if self.entries.is_empty() {
            return Err(LayoutError::Empty);
        }
        let next = match self.entries.get_index_of(current) {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        self.entries
            .get_index(next)
            .map(|(name, _)| name.as_str())
            .ok_or(LayoutError::Empty)
    }
}
