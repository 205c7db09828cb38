//! Where manifests come from

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use crate::manifest::{parse_manifest, Manifest};
use crate::{DataError, Result};

/// A source of content manifests
pub trait ContentSource: Send + Sync {
    /// Human-readable source name for logs and window titles
    fn name(&self) -> &str;

    /// Load the current manifest
    fn load(&self) -> Result<Manifest>;

    /// Whether a reload would see different content since `since`. Sources
    /// that cannot tell report `false`.
    fn changed_since(&self, _since: SystemTime) -> bool {
        false
    }
}

/// Manifest file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Manifest> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        let manifest = parse_manifest(&json)?;
        info!(
            path = %self.path.display(),
            categories = manifest.categories.len(),
            items = manifest.item_count(),
            "Loaded content manifest"
        );
        Ok(manifest)
    }

    fn changed_since(&self, since: SystemTime) -> bool {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map(|modified| modified > since)
            .unwrap_or(false)
    }
}

/// Manifest held in memory, e.g. one compiled into the binary
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    json: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }
}

impl ContentSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Manifest> {
        parse_manifest(&self.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"[{ "id": "a", "items": [{ "id": "a1" }, { "id": "a2" }] }]"#;

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new("demo", MANIFEST);
        assert_eq!(source.name(), "demo");
        assert_eq!(source.load().expect("manifest").item_count(), 2);
        assert!(!source.changed_since(SystemTime::UNIX_EPOCH));
    }

    #[test]
    fn test_file_source() {
        let path = std::env::temp_dir().join(format!("sn-data-test-{}.json", std::process::id()));
        std::fs::write(&path, MANIFEST).expect("write manifest");

        let source = FileSource::new(&path);
        assert!(source.name().starts_with("sn-data-test-"));
        assert_eq!(source.load().expect("manifest").categories.len(), 1);
        assert!(source.changed_since(SystemTime::UNIX_EPOCH));

        std::fs::remove_file(&path).expect("cleanup");
        assert!(matches!(source.load(), Err(DataError::Io { .. })));
        assert!(!source.changed_since(SystemTime::UNIX_EPOCH));
    }
}
