use std::fmt::{self, Write};
use std::ops::Range;

/// Emphasis strength: `*a*` is single, `**a**` is double.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Single,
    Double,
}

/// The kind of a document tree node, along with its kind-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,

    // Blocks
    Heading { level: u8 },
    Paragraph,
    Blockquote,
    FencedCodeBlock { info: String, literal: String },
    ThematicBreak,
    Table,
    TableRow,
    TableCell,
    List { ordered: bool, start: u64 },
    ListItem,

    // Inlines
    Text { literal: String },
    Emphasis { strength: Strength },
    Strikethrough,
    CodeSpan { literal: String },
    Link { destination: String },
    Image { destination: String },
    AutoLink { destination: String },
    HardBreak,
    SoftBreak,

    /// Anything the renderers have no rule for: indented code, raw HTML,
    /// task list markers, footnotes.
    Other { name: &'static str },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Blockquote => "Blockquote",
            NodeKind::FencedCodeBlock { .. } => "FencedCodeBlock",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::Table => "Table",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::List { .. } => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::Text { .. } => "Text",
            NodeKind::Emphasis { .. } => "Emphasis",
            NodeKind::Strikethrough => "Strikethrough",
            NodeKind::CodeSpan { .. } => "CodeSpan",
            NodeKind::Link { .. } => "Link",
            NodeKind::Image { .. } => "Image",
            NodeKind::AutoLink { .. } => "AutoLink",
            NodeKind::HardBreak => "HardBreak",
            NodeKind::SoftBreak => "SoftBreak",
            NodeKind::Other { name } => *name,
        }
    }
}

/// A node of the parsed document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Byte range of the node in the source text.
    pub span: Range<usize>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List { .. })
    }

    /// The child if this node has exactly one.
    pub fn only_child(&self) -> Option<&Node> {
        match self.children.as_slice() {
            [child] => Some(child),
            _ => None,
        }
    }
}

/// A parsed Markdown document: the source text and the tree built from it.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub root: Node,
}

impl Document {
    /// Top-level blocks, in document order.
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }

    /// The source text a node was parsed from.
    pub fn source_of(&self, node: &Node) -> &str {
        self.source.get(node.span.clone()).unwrap_or("")
    }

    /// Render the tree as an indented outline, one node per line, for
    /// debugging the parser's view of a document.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        self.dump_node(&self.root, 0, &mut out).ok();
        out
    }

    fn dump_node(&self, node: &Node, depth: usize, out: &mut String) -> fmt::Result {
        let indent = "    ".repeat(depth);
        writeln!(
            out,
            "{indent}{} [{}..{}]",
            node.kind.name(),
            node.span.start,
            node.span.end
        )?;

        match &node.kind {
            NodeKind::Heading { level } => {
                writeln!(out, "{indent}  - Level: {level}")?;
            }
            NodeKind::List { ordered, start } => {
                writeln!(out, "{indent}  - Ordered: {ordered}, Start: {start}")?;
            }
            NodeKind::Emphasis { strength } => {
                writeln!(out, "{indent}  - Strength: {strength:?}")?;
            }
            NodeKind::Link { destination }
            | NodeKind::Image { destination }
            | NodeKind::AutoLink { destination } => {
                writeln!(out, "{indent}  - Destination: {destination:?}")?;
            }
            NodeKind::FencedCodeBlock { info, .. } => {
                writeln!(out, "{indent}  - Info: {info:?}")?;
            }
            _ => {}
        }

        match &node.kind {
            NodeKind::Text { literal }
            | NodeKind::CodeSpan { literal }
            | NodeKind::FencedCodeBlock { literal, .. } => {
                writeln!(out, "{indent}  - Text: {literal:?}")?;
            }
            NodeKind::Document => {}
            _ => {
                writeln!(out, "{indent}  - Source: {:?}", self.source_of(node))?;
            }
        }

        for child in &node.children {
            self.dump_node(child, depth + 1, out)?;
        }
        Ok(())
    }
}
