//! Named presets for layer configurations.
//!
//! Storage is abstracted behind [`PresetStore`] so the client can keep
//! presets in browser storage, a file, or memory without the engine caring.
//! [`MemoryPresetStore`] is the in-process implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::layer::LayerTransform;

/// Key-value storage for named presets.
///
/// Names are trimmed before use; an empty name is rejected on `put`.
pub trait PresetStore<V> {
    /// Look up a preset by name.
    fn get(&self, name: &str) -> Option<V>;

    /// Store a preset, returning the value it replaced.
    fn put(&mut self, name: &str, value: V) -> Result<Option<V>>;

    /// All preset names in sorted order.
    fn list(&self) -> Vec<String>;

    /// Remove a preset, returning it if it existed.
    fn delete(&mut self, name: &str) -> Option<V>;
}

/// A saved stack of layer transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPreset {
    /// Preview canvas size the transforms were authored against
    pub preview_canvas_size: u32,
    /// Layer transforms, bottom layer first
    pub layers: Vec<LayerTransform>,
}

impl LayerPreset {
    pub fn new(preview_canvas_size: u32, layers: Vec<LayerTransform>) -> Self {
        Self {
            preview_canvas_size,
            layers,
        }
    }
}

/// In-memory preset store.
#[derive(Debug, Clone)]
pub struct MemoryPresetStore<V> {
    presets: BTreeMap<String, V>,
}

impl<V> Default for MemoryPresetStore<V> {
    fn default() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }
}

impl<V> MemoryPresetStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl<V: Clone> PresetStore<V> for MemoryPresetStore<V> {
    fn get(&self, name: &str) -> Option<V> {
        self.presets.get(name.trim()).cloned()
    }

    fn put(&mut self, name: &str, value: V) -> Result<Option<V>> {
        let name = normalize_name(name)?;
        Ok(self.presets.insert(name, value))
    }

    fn list(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    fn delete(&mut self, name: &str) -> Option<V> {
        self.presets.remove(name.trim())
    }
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidPresetName);
    }
    Ok(trimmed.to_string())
}
