//! The sample gallery: an ordered, immutable list of sample images.

use std::collections::HashSet;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::error::CatalogError;

/// Manifest compiled into the binary, used when no manifest is found on disk.
const BUILTIN_MANIFEST: &str = include_str!("../assets/samples.json");

/// One entry of the sample gallery.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SampleEntry {
    pub id: String,
    /// Location relative to the asset root, e.g. `/samples/cat.jpg`.
    pub path: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

#[derive(Clone, Debug, Default)]
pub struct SampleCatalog {
    entries: Vec<SampleEntry>,
}

impl SampleCatalog {
    /// Build a catalog, rejecting duplicate ids and empty paths.
    pub fn new(entries: Vec<SampleEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.path.trim().is_empty() {
                return Err(CatalogError::EmptyPath {
                    id: entry.id.clone(),
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: entry.id.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON manifest (an array of entries).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<SampleEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// The gallery shipped with the application.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_MANIFEST).unwrap_or_else(|e| {
            log::error!("Built-in sample manifest is invalid: {e}");
            Self::default()
        })
    }

    /// Load the manifest at `path`, falling back to the built-in gallery.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_builtin(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(CatalogError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(catalog) => {
                log::info!("Loaded {} samples from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                log::warn!(
                    "Using built-in samples, could not load {}: {e}",
                    path.display()
                );
                Self::builtin()
            }
        }
    }

    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&SampleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn entry(id: &str, path: &str, name: &str) -> SampleEntry {
    SampleEntry {
        id: id.to_owned(),
        path: path.to_owned(),
        name: name.to_owned(),
        description: String::new(),
        category: "Test".to_owned(),
    }
}
