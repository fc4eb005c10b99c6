//! Material name → raw texture bytes.

use std::collections::BTreeMap;

/// Read-only lookup from material names to encoded image bytes.
///
/// Populated by the host before rendering. Renderers treat a missing key as
/// "skip this panel", never as a fatal error.
#[derive(Debug, Clone, Default)]
pub struct TextureCatalog {
    entries: BTreeMap<String, Vec<u8>>,
}

impl TextureCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a material.
    pub fn insert(&mut self, material: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(material.into(), bytes);
    }

    /// Encoded bytes for a material.
    #[must_use]
    pub fn get(&self, material: &str) -> Option<&[u8]> {
        self.entries.get(material).map(Vec::as_slice)
    }

    /// Whether the material exists.
    #[must_use]
    pub fn contains(&self, material: &str) -> bool {
        self.entries.contains_key(material)
    }

    /// Material names in sorted order.
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<u8>)> for TextureCatalog {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
