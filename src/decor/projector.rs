//! DecorationProjector - rule matches re-based onto document positions
//!
//! `compute_decorations` is a pure function of the document snapshot and the
//! compiled rules. Nothing is cached between calls; the caller drops the
//! previous set and takes the new one.

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::encoding::{OffsetEncoding, OffsetMapper};
use super::error::ConfigurationError;
use super::matcher::{MatchSpan, PatternMatcher};
use super::rule::RuleBinding;

// =============================================================================
// Types
// =============================================================================

/// A styled range in global document positions
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub start: usize,
    pub end: usize,
    pub class_name: String,
}

/// Decorations for one document snapshot, in document order, then rule
/// order, then match order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

/// Counters for a single projection
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionStats {
    pub runs_scanned: usize,
    pub text_length: usize,
    pub decorations: usize,
    pub elapsed_us: u64,
}

impl DecorationSet {
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Decorations overlapping `[from, to)`
    pub fn find(&self, from: usize, to: usize) -> Vec<&Decoration> {
        self.decorations
            .iter()
            .filter(|d| d.start < to && d.end > from)
            .collect()
    }

    pub fn with_class<'a>(
        &'a self,
        class_name: &'a str,
    ) -> impl Iterator<Item = &'a Decoration> + 'a {
        self.decorations.iter().filter(move |d| d.class_name == class_name)
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}

// =============================================================================
// DecorationProjector
// =============================================================================

#[derive(Debug, Clone)]
struct CompiledBinding {
    matcher: PatternMatcher,
    class_name: String,
}

/// Validated rule set plus the offset encoding of the host
#[derive(Debug, Clone)]
pub struct DecorationProjector {
    bindings: Vec<CompiledBinding>,
    encoding: OffsetEncoding,
}

impl DecorationProjector {
    /// Compile every binding; the first invalid one aborts construction
    pub fn new(
        bindings: &[RuleBinding],
        encoding: OffsetEncoding,
    ) -> Result<Self, ConfigurationError> {
        let mut compiled = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if binding.class_name.trim().is_empty() {
                return Err(ConfigurationError::EmptyClassName {
                    rule: binding.tag().to_string(),
                });
            }
            compiled.push(CompiledBinding {
                matcher: PatternMatcher::compile(binding.tag(), &binding.rule)?,
                class_name: binding.class_name.clone(),
            });
        }

        Ok(Self {
            bindings: compiled,
            encoding,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn encoding(&self) -> OffsetEncoding {
        self.encoding
    }

    /// Scan every text run with every rule and emit global decorations
    pub fn compute_decorations(&self, doc: &Document) -> DecorationSet {
        DecorationSet {
            decorations: self.project(doc, None),
        }
    }

    /// Same as `compute_decorations`, plus counters and timing
    pub fn compute_with_stats(&self, doc: &Document) -> (DecorationSet, ProjectionStats) {
        let started = instant::Instant::now();
        let mut stats = ProjectionStats::default();
        let decorations = self.project(doc, Some(&mut stats));

        stats.decorations = decorations.len();
        stats.elapsed_us = started.elapsed().as_micros() as u64;
        (DecorationSet { decorations }, stats)
    }

    fn project(
        &self,
        doc: &Document,
        mut stats: Option<&mut ProjectionStats>,
    ) -> Vec<Decoration> {
        let mut decorations = Vec::new();

        for run in doc.text_runs(self.encoding) {
            if let Some(stats) = stats.as_deref_mut() {
                stats.runs_scanned += 1;
                stats.text_length += self.encoding.len(run.text);
            }
            for binding in &self.bindings {
                let spans = binding.matcher.scan(run.text);
                self.rebase(run.text, run.start, &spans, &binding.class_name, &mut decorations);
            }
        }

        decorations
    }

    fn rebase(
        &self,
        text: &str,
        run_start: usize,
        spans: &[MatchSpan],
        class_name: &str,
        out: &mut Vec<Decoration>,
    ) {
        let mut mapper = OffsetMapper::new(text, self.encoding);
        for span in spans {
            let start = run_start + mapper.map(span.start);
            let end = run_start + mapper.map(span.end);
            out.push(Decoration {
                start,
                end,
                class_name: class_name.to_string(),
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
