//! Document model read by the projector
//!
//! A read-only tree of container nodes, atom leaves and text runs. Positions
//! follow the editor's rules:
//! - the root's own boundaries take no positions
//! - every other container takes one position on open and one on close
//! - an atom leaf (hard break, image, ...) takes one position
//! - text takes its length in the chosen `OffsetEncoding`
//!
//! Documents coming from the browser arrive as ProseMirror `doc.toJSON()`
//! output and are decoded through `PmNode`.

use serde::{Deserialize, Serialize};

use super::encoding::OffsetEncoding;

// =============================================================================
// Types
// =============================================================================

/// A node below the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element { kind: String, children: Vec<Node> },
    Atom { kind: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            kind: kind.into(),
            children,
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::element("paragraph", children)
    }

    pub fn atom(kind: impl Into<String>) -> Self {
        Node::Atom { kind: kind.into() }
    }

    /// Number of positions this node occupies
    pub fn size(&self, encoding: OffsetEncoding) -> usize {
        match self {
            Node::Text(text) => encoding.len(text),
            Node::Atom { .. } => 1,
            Node::Element { children, .. } => {
                2 + children.iter().map(|c| c.size(encoding)).sum::<usize>()
            }
        }
    }
}

/// An immutable document snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    children: Vec<Node>,
}

/// A text leaf and the global position of its first unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRun<'d> {
    pub text: &'d str,
    pub start: usize,
}

/// ProseMirror JSON node (`{ type, text?, content? }`); marks and attrs are ignored
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PmNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<PmNode>,
}

// =============================================================================
// Document
// =============================================================================

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// A document holding one text run at position 0
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Node::text(text)])
    }

    /// Decode ProseMirror JSON. Non-text nodes whose type is listed in
    /// `atom_types` become atoms; all others are containers.
    pub fn from_pm(root: PmNode, atom_types: &[String]) -> Self {
        if let Some(text) = root.text {
            return Self::from_text(text);
        }
        let children = root
            .content
            .into_iter()
            .map(|n| convert_pm(n, atom_types))
            .collect();
        Self::new(children)
    }

    pub fn from_json(json: &str, atom_types: &[String]) -> Result<Self, serde_json::Error> {
        let root: PmNode = serde_json::from_str(json)?;
        Ok(Self::from_pm(root, atom_types))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Total number of positions inside the root
    pub fn content_size(&self, encoding: OffsetEncoding) -> usize {
        self.children.iter().map(|c| c.size(encoding)).sum()
    }

    /// Text runs in document order with their global start positions
    pub fn text_runs(&self, encoding: OffsetEncoding) -> TextRuns<'_> {
        TextRuns {
            stack: vec![Frame {
                nodes: self.children.iter(),
                closes: false,
            }],
            cursor: 0,
            encoding,
        }
    }

    /// Visit every text run in document order
    pub fn for_each_text_node<F>(&self, encoding: OffsetEncoding, mut visit: F)
    where
        F: FnMut(TextRun<'_>),
    {
        for run in self.text_runs(encoding) {
            visit(run);
        }
    }
}

fn convert_pm(node: PmNode, atom_types: &[String]) -> Node {
    if let Some(text) = node.text {
        return Node::Text(text);
    }
    if node.content.is_empty() && atom_types.iter().any(|t| *t == node.kind) {
        return Node::Atom { kind: node.kind };
    }
    let children = node
        .content
        .into_iter()
        .map(|n| convert_pm(n, atom_types))
        .collect();
    Node::Element {
        kind: node.kind,
        children,
    }
}

// =============================================================================
// Traversal
// =============================================================================

struct Frame<'d> {
    nodes: std::slice::Iter<'d, Node>,
    closes: bool,
}

/// Depth-first text run iterator with an explicit stack
pub struct TextRuns<'d> {
    stack: Vec<Frame<'d>>,
    cursor: usize,
    encoding: OffsetEncoding,
}

impl<'d> Iterator for TextRuns<'d> {
    type Item = TextRun<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.nodes.next() {
                None => {
                    if let Some(done) = self.stack.pop() {
                        if done.closes {
                            self.cursor += 1;
                        }
                    }
                }
                Some(Node::Text(text)) => {
                    if text.is_empty() {
                        continue;
                    }
                    let start = self.cursor;
                    self.cursor += self.encoding.len(text);
                    return Some(TextRun { text, start });
                }
                Some(Node::Atom { .. }) => self.cursor += 1,
                Some(Node::Element { children, .. }) => {
                    self.cursor += 1;
                    self.stack.push(Frame {
                        nodes: children.iter(),
                        closes: true,
                    });
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
