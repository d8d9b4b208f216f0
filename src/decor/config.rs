//! Engine configuration
//!
//! JSON shape (field names are camelCase):
//! ```json
//! {
//!   "encoding": "utf16",
//!   "atomTypes": ["hardBreak", "image"],
//!   "rules": [
//!     { "className": "auto-bold", "rule": { "kind": "wordlist", "words": ["ASAP"] } },
//!     {
//!       "className": "highlight-variable",
//!       "rule": { "kind": "pattern", "source": "{{ identifier }}" }
//!     }
//!   ]
//! }
//! ```
//! Missing fields fall back to the prompt editor defaults. Configurations
//! decoded from JSON come from JavaScript hosts, so they default to UTF-16.

use serde::{Deserialize, Serialize};

use super::encoding::OffsetEncoding;
use super::error::ConfigurationError;
use super::projector::DecorationProjector;
use super::rule::{Rule, RuleBinding};

pub const AUTO_BOLD_CLASS: &str = "auto-bold";
pub const VARIABLE_CLASS: &str = "highlight-variable";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleBinding>,
    #[serde(default = "default_encoding")]
    pub encoding: OffsetEncoding,
    /// Node types decoded as single-position leaves
    #[serde(default = "default_atom_types")]
    pub atom_types: Vec<String>,
}

fn default_rules() -> Vec<RuleBinding> {
    vec![
        RuleBinding::new(Rule::words(["ASAP", "important"]), AUTO_BOLD_CLASS)
            .named("autoBoldWords"),
        RuleBinding::new(Rule::pattern("{{ identifier }}"), VARIABLE_CLASS)
            .named("variableHighlighter"),
    ]
}

fn default_encoding() -> OffsetEncoding {
    OffsetEncoding::Utf16
}

fn default_atom_types() -> Vec<String> {
    ["hardBreak", "image", "horizontalRule", "mention"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::prompt_editor()
    }
}

impl EngineConfig {
    /// Rust-side configuration: the given rules, UTF-8 positions
    pub fn new(rules: Vec<RuleBinding>) -> Self {
        Self {
            rules,
            encoding: OffsetEncoding::Utf8,
            atom_types: default_atom_types(),
        }
    }

    /// Bold `ASAP`/`important` and highlight `{{ placeholders }}`, UTF-16 positions
    pub fn prompt_editor() -> Self {
        Self {
            rules: default_rules(),
            encoding: default_encoding(),
            atom_types: default_atom_types(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))
    }

    pub fn with_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_rule(mut self, binding: RuleBinding) -> Self {
        self.rules.push(binding);
        self
    }

    /// Validate and compile the rules
    pub fn build(&self) -> Result<DecorationProjector, ConfigurationError> {
        DecorationProjector::new(&self.rules, self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_prompt_editor() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::prompt_editor());
        assert_eq!(config.encoding, OffsetEncoding::Utf16);
        assert_eq!(config.rules.len(), 2);
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "encoding": "utf8",
            "atomTypes": [],
            "rules": [
                {
                    "name": "urgent",
                    "className": "urgent",
                    "rule": { "kind": "regex", "source": "(?i)urgent!*" }
                }
            ]
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.encoding, OffsetEncoding::Utf8);
        assert!(config.atom_types.is_empty());
        assert_eq!(config.rules[0].tag(), "urgent");
        assert_eq!(config.build().unwrap().rule_count(), 1);
    }

    #[test]
    fn test_malformed_json() {
        let json = r#"{ "rules": [{ "rule": { "kind": "glob" } }] }"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigurationError::Malformed(_)));
    }

    #[test]
    fn test_invalid_rule_fails_build_not_parse() {
        let json = r#"{
            "rules": [{ "className": "x", "rule": { "kind": "regex", "source": "[" } }]
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert!(matches!(config.build(), Err(ConfigurationError::InvalidRegex { .. })));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new(vec![])
            .with_rule(RuleBinding::new(Rule::words(["hi"]), "greet"))
            .with_encoding(OffsetEncoding::Utf16);
        let projector = config.build().unwrap();
        assert_eq!(projector.rule_count(), 1);
        assert_eq!(projector.encoding(), OffsetEncoding::Utf16);
    }
}
