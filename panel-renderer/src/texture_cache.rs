//! Cache of decoded material textures.
//!
//! Decoding a JPEG texture is the most expensive per-panel step; panels that
//! share a material reuse one decoded image across preview and export passes.
//! The catalog stays the authority: an entry is only reused while the
//! catalog still holds the same bytes under that material.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use image::RgbaImage;

use crate::catalog::TextureCatalog;
use crate::error::{RenderError, RenderResult};
use crate::image::decode_texture;

/// Entry in the texture cache.
#[derive(Debug)]
struct CacheEntry {
    /// The decoded texture.
    data: Arc<RgbaImage>,
    /// Access tick of the last lookup.
    last_accessed: u64,
    /// Size in bytes.
    size_bytes: usize,
    /// Fingerprint of the encoded bytes this entry was decoded from.
    source: SourceKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceKey {
    len: usize,
    hash: u64,
}

impl SourceKey {
    fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            len: bytes.len(),
            hash: hasher.finish(),
        }
    }
}

/// Configuration for the texture cache.
#[derive(Debug, Clone)]
pub struct TextureCacheConfig {
    /// Maximum cache size in bytes.
    pub max_size_bytes: usize,
    /// Maximum number of entries.
    pub max_entries: usize,
}

impl Default for TextureCacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 256 * 1024 * 1024, // 256 MB
            max_entries: 64,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
}

/// LRU cache of decoded textures keyed by material name.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, CacheEntry>,
    config: TextureCacheConfig,
    current_size: usize,
    tick: u64,
    stats: CacheStats,
}

impl TextureCache {
    /// Create a new texture cache with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TextureCacheConfig::default())
    }

    /// Create a new texture cache with custom configuration.
    #[must_use]
    pub fn with_config(config: TextureCacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            current_size: 0,
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Decoded texture for `material`, decoding from `catalog` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingTexture`] if the catalog has no such
    /// material and [`RenderError::Resource`] if its bytes do not decode.
    pub fn get_or_decode(
        &mut self,
        catalog: &TextureCatalog,
        material: &str,
    ) -> RenderResult<Arc<RgbaImage>> {
        self.tick += 1;
        let bytes = catalog
            .get(material)
            .ok_or_else(|| RenderError::MissingTexture(material.to_string()))?;
        let source = SourceKey::of(bytes);

        if let Some(entry) = self.entries.get_mut(material) {
            if entry.source == source {
                entry.last_accessed = self.tick;
                self.stats.hits += 1;
                return Ok(Arc::clone(&entry.data));
            }
        }
        if self.remove(material) {
            tracing::debug!("Texture '{material}' changed in the catalog, decoding again");
        }
        self.stats.misses += 1;

        let data = Arc::new(decode_texture(bytes)?);
        self.insert(material.to_string(), Arc::clone(&data), source);
        Ok(data)
    }

    fn insert(&mut self, key: String, data: Arc<RgbaImage>, source: SourceKey) {
        let size_bytes = data.as_raw().len();
        self.evict_if_needed(size_bytes);
        self.current_size += size_bytes;
        self.entries.insert(
            key,
            CacheEntry {
                data,
                last_accessed: self.tick,
                size_bytes,
                source,
            },
        );
    }

    fn remove(&mut self, material: &str) -> bool {
        match self.entries.remove(material) {
            Some(entry) => {
                self.current_size -= entry.size_bytes;
                true
            }
            None => false,
        }
    }

    /// Check if a texture is cached.
    #[must_use]
    pub fn contains(&self, material: &str) -> bool {
        self.entries.contains_key(material)
    }

    /// Clear all cached textures.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_size = 0;
    }

    /// Get the current number of cached textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the current cache size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.current_size
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Evict old entries if needed to make room for a new entry.
    fn evict_if_needed(&mut self, needed_bytes: usize) {
        while self.current_size + needed_bytes > self.config.max_size_bytes
            && !self.entries.is_empty()
        {
            self.evict_lru();
        }

        while self.entries.len() >= self.config.max_entries && !self.entries.is_empty() {
            self.evict_lru();
        }
    }

    /// Evict the least recently used entry.
    fn evict_lru(&mut self) {
        let oldest_key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest_key {
            if let Some(entry) = self.entries.remove(&key) {
                self.current_size -= entry.size_bytes;
                self.stats.evictions += 1;
            }
        }
    }
}
