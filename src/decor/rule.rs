//! Rule definitions and their translation to regular expressions.
//!
//! Three rule kinds are recognised:
//! - `wordlist`: whole words, case-insensitive unless `caseSensitive`
//! - `pattern`: a delimiter template such as `{{ identifier }}`
//! - `regex`: a raw regular expression
//!
//! Every kind compiles down to one `regex::Regex`. Validation happens here,
//! once, so scanning never has to deal with a bad rule.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

static WORD_CHAR: OnceLock<Regex> = OnceLock::new();

// =============================================================================
// Types
// =============================================================================

/// A matcher definition, as supplied by configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Rule {
    Wordlist {
        words: Vec<String>,
        #[serde(default, rename = "caseSensitive")]
        case_sensitive: bool,
    },
    Pattern {
        source: String,
    },
    Regex {
        source: String,
    },
}

/// A rule paired with the class name its decorations carry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleBinding {
    /// Tag reported on match spans; falls back to the class name
    #[serde(default)]
    pub name: Option<String>,
    pub class_name: String,
    pub rule: Rule,
}

impl RuleBinding {
    pub fn new(rule: Rule, class_name: impl Into<String>) -> Self {
        Self {
            name: None,
            class_name: class_name.into(),
            rule,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name used in match tags and error messages
    pub fn tag(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.class_name)
    }
}

impl Rule {
    /// Case-insensitive word list
    pub fn words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Wordlist {
            words: words.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        }
    }

    /// Word list compared byte-for-byte
    pub fn words_case_sensitive<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Wordlist {
            words: words.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    pub fn pattern(source: impl Into<String>) -> Self {
        Rule::Pattern { source: source.into() }
    }

    pub fn regex(source: impl Into<String>) -> Self {
        Rule::Regex { source: source.into() }
    }

    /// Validate the rule and produce the regex source it scans with
    pub fn to_regex_source(&self, tag: &str) -> Result<String, ConfigurationError> {
        match self {
            Rule::Wordlist {
                words,
                case_sensitive,
            } => wordlist_source(tag, words, *case_sensitive),
            Rule::Pattern { source } => Ok(Template::parse(tag, source)?.to_regex_source()),
            Rule::Regex { source } => Ok(source.clone()),
        }
    }
}

// =============================================================================
// Word lists
// =============================================================================

/// Same character class as the regex `\w` that `\b` is defined by, so
/// marks and joiners count as word characters
pub(crate) fn is_word_char(c: char) -> bool {
    let word = WORD_CHAR.get_or_init(|| Regex::new(r"^\w$").expect("static pattern compiles"));
    let mut buf = [0u8; 4];
    word.is_match(c.encode_utf8(&mut buf))
}

fn wordlist_source(
    tag: &str,
    words: &[String],
    case_sensitive: bool,
) -> Result<String, ConfigurationError> {
    if words.is_empty() {
        return Err(ConfigurationError::EmptyWordList { rule: tag.to_string() });
    }

    let mut unique: Vec<&str> = Vec::with_capacity(words.len());
    for (index, word) in words.iter().enumerate() {
        if word.trim().is_empty() {
            return Err(ConfigurationError::EmptyWord { rule: tag.to_string(), index });
        }
        let seen = unique.iter().any(|w| {
            if case_sensitive {
                *w == word.as_str()
            } else {
                w.to_lowercase() == word.to_lowercase()
            }
        });
        if !seen {
            unique.push(word.as_str());
        }
    }

    // Longest first: alternation is leftmost-first, so a longer word must be
    // tried before any of its prefixes.
    unique.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let alternatives: Vec<String> = unique.iter().map(|word| bounded_word(word)).collect();

    let flags = if case_sensitive { "" } else { "(?i)" };
    Ok(format!("{}(?:{})", flags, alternatives.join("|")))
}

/// Escape a word and add `\b` on each side that ends in a word character.
/// A side that ends in punctuation is delimited by the punctuation itself.
fn bounded_word(word: &str) -> String {
    let leading = word.chars().next().map(is_word_char).unwrap_or(false);
    let trailing = word.chars().last().map(is_word_char).unwrap_or(false);

    let mut out = String::with_capacity(word.len() + 6);
    if leading {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(word));
    if trailing {
        out.push_str(r"\b");
    }
    out
}

// =============================================================================
// Delimiter templates
// =============================================================================

/// Content accepted between the delimiters of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Dotted identifier: `user.name`
    Identifier,
    /// Word characters only
    Word,
    /// Anything up to the closing delimiter
    Text,
}

impl Slot {
    fn parse(name: &str) -> Option<Slot> {
        match name {
            "identifier" => Some(Slot::Identifier),
            "word" => Some(Slot::Word),
            "text" => Some(Slot::Text),
            _ => None,
        }
    }
}

/// Parsed form of `OPEN [ws] SLOT [ws] CLOSE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub open: String,
    pub close: String,
    pub slot: Slot,
    pub pad_open: bool,
    pub pad_close: bool,
}

impl Template {
    pub fn parse(tag: &str, source: &str) -> Result<Template, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidTemplate {
            rule: tag.to_string(),
            source: source.to_string(),
            reason: reason.to_string(),
        };

        let slot_start = source
            .char_indices()
            .find(|(_, c)| is_word_char(*c))
            .map(|(i, _)| i)
            .ok_or_else(|| invalid("missing slot name"))?;
        let slot_end = source[slot_start..]
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map(|(i, _)| slot_start + i)
            .unwrap_or(source.len());

        let slot_name = &source[slot_start..slot_end];
        let slot = Slot::parse(slot_name)
            .ok_or_else(|| invalid(&format!("unknown slot '{}'", slot_name)))?;

        let prefix = &source[..slot_start];
        let suffix = &source[slot_end..];
        let open = prefix.trim_end();
        let close = suffix.trim_start();

        if open.is_empty() {
            return Err(invalid("missing opening delimiter"));
        }
        if close.is_empty() {
            return Err(invalid("missing closing delimiter"));
        }
        if open.chars().any(char::is_whitespace) || close.chars().any(char::is_whitespace) {
            return Err(invalid("delimiters may not contain whitespace"));
        }
        if close.chars().any(is_word_char) {
            return Err(invalid("closing delimiter may not contain word characters"));
        }

        Ok(Template {
            open: open.to_string(),
            close: close.to_string(),
            slot,
            pad_open: open.len() != prefix.len(),
            pad_close: close.len() != suffix.len(),
        })
    }

    pub fn to_regex_source(&self) -> String {
        let slot = match self.slot {
            Slot::Identifier => r"[\w.]+".to_string(),
            Slot::Word => r"\w+".to_string(),
            Slot::Text => {
                // close is non-empty after parse
                let stop = self.close.chars().next().unwrap_or('\n');
                format!("[^{}]+?", regex::escape(&stop.to_string()))
            }
        };

        let mut out = regex::escape(&self.open);
        if self.pad_open {
            out.push_str(r"\s*");
        }
        out.push_str(&slot);
        if self.pad_close {
            out.push_str(r"\s*");
        }
        out.push_str(&regex::escape(&self.close));
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
