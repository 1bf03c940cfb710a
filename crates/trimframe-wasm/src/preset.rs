//! Layer preset bindings.
//!
//! Presets live in WASM memory for the session. Persist them across sessions
//! by storing `JsLayerPreset.to_json()` in browser storage.

use crate::layer::JsLayerTransform;
use crate::types::to_js_error;
use trimframe_core::{LayerPreset, MemoryPresetStore, PresetStore};
use wasm_bindgen::prelude::*;

/// A named stack of layer transforms.
#[wasm_bindgen]
pub struct JsLayerPreset {
    inner: LayerPreset,
}

#[wasm_bindgen]
impl JsLayerPreset {
    /// Create an empty preset authored against a preview canvas size
    #[wasm_bindgen(constructor)]
    pub fn new(preview_canvas_size: u32) -> JsLayerPreset {
        Self {
            inner: LayerPreset::new(preview_canvas_size, Vec::new()),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn preview_canvas_size(&self) -> u32 {
        self.inner.preview_canvas_size
    }

    /// Number of layers in the preset
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.layers.len()
    }

    /// Append a layer transform (bottom layer first)
    pub fn push_layer(&mut self, transform: &JsLayerTransform) {
        self.inner.layers.push(*transform.inner());
    }

    /// Transform of the layer at `index`
    pub fn layer(&self, index: usize) -> Option<JsLayerTransform> {
        self.inner.layers.get(index).copied().map(JsLayerTransform::from_core)
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsLayerPreset, JsValue> {
        let inner: LayerPreset =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

/// In-memory store of named layer presets.
///
/// # Example (TypeScript)
/// ```typescript
/// const store = new JsPresetStore();
/// store.save("banner", preset);
/// const names = store.list();      // ["banner"]
/// const loaded = store.load("banner");
/// ```
#[wasm_bindgen]
#[derive(Default)]
pub struct JsPresetStore {
    inner: MemoryPresetStore<LayerPreset>,
}

#[wasm_bindgen]
impl JsPresetStore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPresetStore {
        Self::default()
    }

    /// Number of stored presets
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Store a preset under `name` (trimmed).
    ///
    /// # Returns
    /// True if an existing preset was replaced.
    ///
    /// # Errors
    /// Returns an error if the name is empty.
    pub fn save(&mut self, name: &str, preset: &JsLayerPreset) -> Result<bool, JsValue> {
        self.inner
            .put(name, preset.inner.clone())
            .map(|previous| previous.is_some())
            .map_err(to_js_error)
    }

    /// Look up a preset by name
    pub fn load(&self, name: &str) -> Option<JsLayerPreset> {
        self.inner.get(name).map(|inner| JsLayerPreset { inner })
    }

    /// Remove a preset; returns true if it existed
    pub fn delete(&mut self, name: &str) -> bool {
        self.inner.delete(name).is_some()
    }

    /// All preset names in sorted order
    pub fn list(&self) -> js_sys::Array {
        self.inner
            .list()
            .into_iter()
            .map(|name| JsValue::from_str(&name))
            .collect()
    }
}
