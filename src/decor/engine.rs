//! DecorationEngine - WASM entry point for the prompt editor
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { DecorationEngine } from 'promptmark';
//!
//! await init();
//! const engine = new DecorationEngine(null); // prompt editor preset
//!
//! // inside a ProseMirror plugin's `decorations` prop
//! const found = engine.computeDecorations(state.doc.toJSON());
//! return DecorationSet.create(state.doc, found.map(d =>
//!   Decoration.inline(d.start, d.end, { class: d.className })));
//! ```
//!
//! Construction is the only call that can fail. `computeDecorations` always
//! returns an array; an undecodable document is logged and yields `[]`.

use wasm_bindgen::prelude::*;

use super::config::EngineConfig;
use super::document::{Document, PmNode};
use super::error::ConfigurationError;
use super::projector::{DecorationProjector, DecorationSet, ProjectionStats};
use crate::console;

/// Compiled rule set plus the document decoding options
#[wasm_bindgen]
pub struct DecorationEngine {
    projector: DecorationProjector,
    atom_types: Vec<String>,
}

#[wasm_bindgen]
impl DecorationEngine {
    /// Create an engine from a config object; `null`/`undefined` selects the
    /// prompt editor preset
    #[wasm_bindgen(constructor)]
    pub fn js_new(config: JsValue) -> Result<DecorationEngine, JsValue> {
        let config: EngineConfig = if config.is_null() || config.is_undefined() {
            EngineConfig::prompt_editor()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| {
                JsValue::from_str(&ConfigurationError::Malformed(e.to_string()).to_string())
            })?
        };

        Self::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decorations for a ProseMirror `doc.toJSON()` value
    #[wasm_bindgen(js_name = computeDecorations)]
    pub fn js_compute_decorations(&self, doc: JsValue) -> JsValue {
        let root: PmNode = match serde_wasm_bindgen::from_value(doc) {
            Ok(root) => root,
            Err(e) => {
                console::error(&format!("[DecorationEngine] Invalid document: {}", e));
                return js_sys::Array::new().into();
            }
        };

        let doc = Document::from_pm(root, &self.atom_types);
        to_js(&self.compute_decorations(&doc))
    }

    /// Decorations for a single plain string, positions relative to its start
    #[wasm_bindgen(js_name = matchText)]
    pub fn js_match_text(&self, text: &str) -> JsValue {
        to_js(&self.match_text(text))
    }

    /// Decorations plus projection counters: `{ decorations, stats }`
    #[wasm_bindgen(js_name = computeWithStats)]
    pub fn js_compute_with_stats(&self, doc: JsValue) -> JsValue {
        let root: PmNode = match serde_wasm_bindgen::from_value(doc) {
            Ok(root) => root,
            Err(e) => {
                console::error(&format!("[DecorationEngine] Invalid document: {}", e));
                PmNode {
                    kind: "doc".to_string(),
                    text: None,
                    content: Vec::new(),
                }
            }
        };

        let doc = Document::from_pm(root, &self.atom_types);
        let (decorations, stats) = self.compute_with_stats(&doc);
        to_js(&StatsEnvelope { decorations, stats })
    }

    #[wasm_bindgen(js_name = ruleCount)]
    pub fn rule_count(&self) -> usize {
        self.projector.rule_count()
    }

    /// Offset encoding in use: `"utf8"` or `"utf16"`
    #[wasm_bindgen(js_name = encoding)]
    pub fn js_encoding(&self) -> String {
        self.projector.encoding().as_str().to_string()
    }
}

#[derive(serde::Serialize)]
struct StatsEnvelope {
    decorations: DecorationSet,
    stats: ProjectionStats,
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            console::warn(&format!("[DecorationEngine] Serialization failed: {}", e));
            js_sys::Array::new().into()
        }
    }
}

impl DecorationEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            projector: config.build()?,
            atom_types: config.atom_types.clone(),
        })
    }

    pub fn projector(&self) -> &DecorationProjector {
        &self.projector
    }

    pub fn compute_decorations(&self, doc: &Document) -> DecorationSet {
        self.projector.compute_decorations(doc)
    }

    pub fn compute_with_stats(&self, doc: &Document) -> (DecorationSet, ProjectionStats) {
        self.projector.compute_with_stats(doc)
    }

    pub fn match_text(&self, text: &str) -> DecorationSet {
        self.projector.compute_decorations(&Document::from_text(text))
    }

    pub fn decode_document(&self, json: &str) -> Result<Document, serde_json::Error> {
        Document::from_json(json, &self.atom_types)
    }

    /// Decode ProseMirror JSON and decorate it; undecodable input yields an
    /// empty set
    pub fn compute_from_json(&self, json: &str) -> DecorationSet {
        match self.decode_document(json) {
            Ok(doc) => self.compute_decorations(&doc),
            Err(e) => {
                console::error(&format!("[DecorationEngine] Invalid document: {}", e));
                DecorationSet::default()
            }
        }
    }
}
