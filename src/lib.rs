//! PromptMark: Prompt Editor Decoration Engine
//!
//! A Rust/WASM implementation of the prompt editor's text decorations.
//!
//! # Architecture
//!
//! ## Decoration Components
//! - `rule.rs` - Rule definitions: word lists, delimiter templates, raw regexes
//! - `matcher.rs` - PatternMatcher: one rule scanned over one string
//! - `document.rs` - Document model and text-run traversal (ProseMirror positions)
//! - `encoding.rs` - UTF-8 / UTF-16 position conversion
//! - `projector.rs` - DecorationProjector: matches re-based to document positions
//! - `config.rs` - EngineConfig and the prompt editor preset
//! - `engine.rs` - DecorationEngine: the WASM entry point
//!
//! # Usage (Rust)
//! ```
//! use promptmark::{Document, EngineConfig, Node, OffsetEncoding, Rule, RuleBinding};
//!
//! let projector = EngineConfig::new(vec![
//!     RuleBinding::new(Rule::words(["ASAP"]), "auto-bold"),
//! ])
//! .build()
//! .unwrap();
//!
//! let doc = Document::new(vec![Node::text("abc "), Node::text("ASAP")]);
//! let found = projector.compute_decorations(&doc);
//! assert_eq!((found.as_slice()[0].start, found.as_slice()[0].end), (4, 8));
//! assert_eq!(projector.encoding(), OffsetEncoding::Utf8);
//! ```

pub mod decor;
mod console;

pub use decor::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("promptmark v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_names_crate() {
        assert!(version().starts_with("promptmark v"));
    }
}
