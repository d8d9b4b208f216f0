//! Configuration errors raised while compiling rule sets.

/// Rejection of a rule configuration at engine construction.
///
/// Compilation is the only fallible step; a compiled engine never errors
/// while computing decorations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A wordlist rule with no words
    EmptyWordList { rule: String },
    /// A wordlist entry that is empty or only whitespace
    EmptyWord { rule: String, index: usize },
    /// A raw regex that failed to compile
    InvalidRegex { rule: String, message: String },
    /// A delimiter template that does not follow `OPEN SLOT CLOSE`
    InvalidTemplate { rule: String, source: String, reason: String },
    /// A binding without a class name to emit
    EmptyClassName { rule: String },
    /// Configuration could not be decoded at all
    Malformed(String),
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::EmptyWordList { rule } => {
                write!(f, "rule '{}': word list is empty", rule)
            }
            ConfigurationError::EmptyWord { rule, index } => {
                write!(f, "rule '{}': word #{} is empty", rule, index)
            }
            ConfigurationError::InvalidRegex { rule, message } => {
                write!(f, "rule '{}': invalid regex: {}", rule, message)
            }
            ConfigurationError::InvalidTemplate { rule, source, reason } => {
                write!(f, "rule '{}': invalid template {:?}: {}", rule, source, reason)
            }
            ConfigurationError::EmptyClassName { rule } => {
                write!(f, "rule '{}': class name is empty", rule)
            }
            ConfigurationError::Malformed(msg) => write!(f, "malformed configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigurationError {}
